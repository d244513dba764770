//! Background reads. Each result is tagged with what started it so the app
//! can drop answers nobody is waiting for anymore.

use engine::{Currency, ExchangeRates, Period, PeriodBook, RecurringExpense};
use finance_client::{Client, ClientError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

#[derive(Debug)]
pub enum Loaded {
    Period {
        period: Period,
        seq: u64,
        result: Result<PeriodBook, ClientError>,
    },
    Rates(Result<ExchangeRates, ClientError>),
    Recurring(Result<Vec<RecurringExpense>, ClientError>),
    Migrated {
        period: Period,
        result: Result<(), ClientError>,
    },
}

#[derive(Debug, Clone)]
pub struct Loader {
    client: Client,
    tx: UnboundedSender<Loaded>,
}

impl Loader {
    pub fn new(client: Client) -> (Self, UnboundedReceiver<Loaded>) {
        let (tx, rx) = unbounded_channel();
        (Self { client, tx }, rx)
    }

    /// Reads `period`; `seq` comes back with the result.
    pub fn period(&self, period: Period, seq: u64) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.period_get(period).await;
            let _ = tx.send(Loaded::Period {
                period,
                seq,
                result,
            });
        });
    }

    pub fn rates(&self, reporting: Currency) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.exchange_rates(reporting).await;
            let _ = tx.send(Loaded::Rates(result));
        });
    }

    pub fn recurring(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.recurring_list().await;
            let _ = tx.send(Loaded::Recurring(result));
        });
    }

    pub fn migrate_pending(&self, period: Period) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.migrate_pending(period).await;
            let _ = tx.send(Loaded::Migrated { period, result });
        });
    }
}
