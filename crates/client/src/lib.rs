//! HTTP client for the finance backend.
//!
//! Every method returns engine types; wire shapes stay inside this crate.

use api_types::{
    ErrorResponse,
    finance::{ExpenseCreated, PeriodFinance},
    rates::ExchangeRatesResponse,
    recurring::RecurringExpenseView,
};
use engine::{
    Currency, ExchangeRates, Expense, ExpenseFields, ExpenseId, ExpensePatch, Income, Period,
    PeriodBook, RecurringExpense, RecurringFields,
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{Serialize, de::DeserializeOwned};

pub use error::ClientError;

mod convert;
mod error;

pub type Result<T> = std::result::Result<T, ClientError>;

const RECURRING_PATH: &str = "api/recurring-expenses";

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    token: Option<String>,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client rooted at `base_url`. Without a token every write
    /// fails with [`ClientError::ReadOnly`] before reaching the network.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let mut root = base_url.trim().to_string();
        if !root.ends_with('/') {
            root.push('/');
        }
        let base_url = Url::parse(&root)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            token: token.filter(|token| !token.trim().is_empty()),
            http: reqwest::Client::new(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn can_write(&self) -> bool {
        self.token.is_some()
    }

    /// Reads the period. A period the backend has never seen is empty.
    pub async fn period_get(&self, period: Period) -> Result<PeriodBook> {
        let url = self.endpoint(&period_path(period, ""))?;
        match self.fetch::<PeriodFinance>(Method::GET, url).await {
            Ok(body) => Ok(convert::book_from_wire(period, body)),
            Err(ClientError::NotFound) => {
                tracing::debug!(%period, "period not found, using empty book");
                Ok(PeriodBook::empty(period))
            }
            Err(err) => Err(err),
        }
    }

    pub async fn expense_create(&self, period: Period, fields: &ExpenseFields) -> Result<Expense> {
        let url = self.endpoint(&period_path(period, "/expenses"))?;
        let request = self.write(Method::POST, url)?;
        let created: ExpenseCreated =
            decode(send(request.json(&convert::expense_new(fields))).await?).await?;
        tracing::info!(%period, id = %created.new_expense.id, "expense created");
        Ok(convert::expense_from_wire(created.new_expense))
    }

    pub async fn expense_update(
        &self,
        period: Period,
        id: &ExpenseId,
        patch: &ExpensePatch,
    ) -> Result<()> {
        let url = self.item_endpoint(&period_path(period, "/expenses"), id)?;
        self.write_json(Method::PUT, url, &convert::expense_update(patch))
            .await?;
        tracing::info!(%period, %id, "expense updated");
        Ok(())
    }

    pub async fn expense_delete(&self, period: Period, id: &ExpenseId) -> Result<()> {
        let url = self.item_endpoint(&period_path(period, "/expenses"), id)?;
        send(self.write(Method::DELETE, url)?).await?;
        tracing::info!(%period, %id, "expense deleted");
        Ok(())
    }

    pub async fn income_put(&self, period: Period, income: &Income) -> Result<()> {
        let url = self.endpoint(&period_path(period, "/income"))?;
        self.write_json(Method::PUT, url, &convert::income_update(income))
            .await?;
        tracing::info!(%period, "income saved");
        Ok(())
    }

    pub async fn income_delete(&self, period: Period) -> Result<()> {
        let url = self.endpoint(&period_path(period, "/income"))?;
        send(self.write(Method::DELETE, url)?).await?;
        tracing::info!(%period, "income deleted");
        Ok(())
    }

    /// Moves pending expenses of earlier periods into `period`.
    pub async fn migrate_pending(&self, period: Period) -> Result<()> {
        let url = self.endpoint(&period_path(period, "/migrate-expenses"))?;
        send(self.write(Method::POST, url)?).await?;
        tracing::info!(%period, "pending expenses migrated");
        Ok(())
    }

    /// Reads upstream quotes and inverts them into factors for `reporting`.
    pub async fn exchange_rates(&self, reporting: Currency) -> Result<ExchangeRates> {
        let url = self.endpoint("exchange-rates")?;
        let body: ExchangeRatesResponse = self.fetch(Method::GET, url).await?;
        if let Some(base) = body.base.as_deref()
            && base != reporting.code()
        {
            tracing::warn!(
                base,
                reporting = reporting.code(),
                "rate base differs from reporting currency"
            );
        }
        let rates = ExchangeRates::from_quoted(
            reporting,
            body.rates.iter().map(|(code, quoted)| (code.as_str(), *quoted)),
        );
        tracing::debug!(quotes = body.rates.len(), "exchange rates loaded");
        Ok(rates)
    }

    pub async fn recurring_list(&self) -> Result<Vec<RecurringExpense>> {
        let url = self.endpoint(RECURRING_PATH)?;
        let body: Vec<RecurringExpenseView> = self.fetch(Method::GET, url).await?;
        Ok(body.into_iter().map(convert::recurring_from_wire).collect())
    }

    pub async fn recurring_create(&self, fields: &RecurringFields) -> Result<()> {
        let url = self.endpoint(RECURRING_PATH)?;
        self.write_json(Method::POST, url, &convert::recurring_upsert(fields))
            .await?;
        tracing::info!(title = %fields.title, "recurring expense created");
        Ok(())
    }

    pub async fn recurring_update(&self, id: &ExpenseId, fields: &RecurringFields) -> Result<()> {
        let url = self.item_endpoint(RECURRING_PATH, id)?;
        self.write_json(Method::PUT, url, &convert::recurring_upsert(fields))
            .await?;
        tracing::info!(%id, "recurring expense updated");
        Ok(())
    }

    pub async fn recurring_delete(&self, id: &ExpenseId) -> Result<()> {
        let url = self.item_endpoint(RECURRING_PATH, id)?;
        send(self.write(Method::DELETE, url)?).await?;
        tracing::info!(%id, "recurring expense deleted");
        Ok(())
    }

    /// Materializes active templates into their periods.
    pub async fn migrate_recurring(&self) -> Result<()> {
        let url = self.endpoint("finance/migrate-recurring-expenses")?;
        send(self.write(Method::POST, url)?).await?;
        tracing::info!("recurring expenses materialized");
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid endpoint {path}: {err}")))
    }

    /// `path` followed by `id` as a single percent-encoded segment.
    fn item_endpoint(&self, path: &str, id: &ExpenseId) -> Result<Url> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Server(format!("invalid endpoint {path}")))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.http.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn write(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        if self.token.is_none() {
            return Err(ClientError::ReadOnly);
        }
        Ok(self.request(method, url))
    }

    async fn fetch<T: DeserializeOwned>(&self, method: Method, url: Url) -> Result<T> {
        decode(send(self.request(method, url)).await?).await
    }

    async fn write_json<B: Serialize>(&self, method: Method, url: Url, body: &B) -> Result<()> {
        send(self.write(method, url)?.json(body)).await?;
        Ok(())
    }
}

fn period_path(period: Period, suffix: &str) -> String {
    format!(
        "finance/{}/{}{suffix}",
        period.month_segment(),
        period.year()
    )
}

async fn send(request: RequestBuilder) -> Result<Response> {
    let res = request.send().await.map_err(ClientError::Transport)?;
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());
    tracing::warn!(status = status.as_u16(), error = %body, "backend request failed");
    Err(ClientError::from_status(status.as_u16(), body))
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T> {
    res.json::<T>().await.map_err(ClientError::Decode)
}
