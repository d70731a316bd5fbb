// In crates/database/src/quotes.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{Quote, Symbol};
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::{Db, Error, QuoteStore, Result};

#[async_trait]
impl QuoteStore for Db {
    async fn load_quotes(&self, symbol: &Symbol) -> Result<Vec<Quote>> {
        let rows = sqlx::query(
            r#"
            SELECT symbol, name, trade_date, open, high, low, close, volume, moving_average
            FROM quotes
            WHERE symbol = ?
            ORDER BY trade_date ASC
            "#,
        )
        .bind(&symbol.0)
        .fetch_all(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        rows.iter().map(quote_from_row).collect()
    }

    async fn replace_quotes(&self, symbol: &Symbol, quotes: &[Quote]) -> Result<()> {
        let mut tx = self.0.begin().await.map_err(Error::OperationFailed)?;

        sqlx::query("DELETE FROM quotes WHERE symbol = ?")
            .bind(&symbol.0)
            .execute(&mut *tx)
            .await
            .map_err(Error::OperationFailed)?;

        for quote in quotes {
            sqlx::query(
                r#"
                INSERT INTO quotes (symbol, name, trade_date, open, high, low, close, volume, moving_average)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&symbol.0)
            .bind(&quote.name)
            .bind(quote.trade_date)
            .bind(quote.open.to_string())
            .bind(quote.high.to_string())
            .bind(quote.low.to_string())
            .bind(quote.close.to_string())
            .bind(quote.volume as i64)
            .bind(quote.moving_average.map(|avg| avg.to_string()))
            .execute(&mut *tx)
            .await
            .map_err(Error::OperationFailed)?;
        }

        tx.commit().await.map_err(Error::OperationFailed)?;
        tracing::debug!(%symbol, rows = quotes.len(), "Replaced stored quotes.");
        Ok(())
    }
}

fn quote_from_row(row: &SqliteRow) -> Result<Quote> {
    let symbol: String = row.try_get("symbol").map_err(Error::OperationFailed)?;
    let trade_date: NaiveDate = row.try_get("trade_date").map_err(Error::OperationFailed)?;
    let moving_average: Option<String> =
        row.try_get("moving_average").map_err(Error::OperationFailed)?;
    let volume: i64 = row.try_get("volume").map_err(Error::OperationFailed)?;

    Ok(Quote {
        symbol: Symbol(symbol),
        name: row.try_get("name").map_err(Error::OperationFailed)?,
        trade_date,
        open: decimal(row, "open")?,
        high: decimal(row, "high")?,
        low: decimal(row, "low")?,
        close: decimal(row, "close")?,
        volume: volume.max(0) as u64,
        moving_average: moving_average
            .map(|text| parse_decimal("moving_average", text))
            .transpose()?,
    })
}

/// Reads a decimal stored as text.
pub(crate) fn decimal(row: &SqliteRow, column: &'static str) -> Result<Decimal> {
    let text: String = row.try_get(column).map_err(Error::OperationFailed)?;
    parse_decimal(column, text)
}

fn parse_decimal(column: &'static str, text: String) -> Result<Decimal> {
    text.parse().map_err(|_| Error::CorruptRow { column, value: text })
}
