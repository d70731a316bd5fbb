// In crates/database/src/alerts.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{Alert, AlertKind, AlertStatus, NewAlert, Symbol};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::quotes::decimal;
use crate::{AlertQuery, AlertStore, Db, Error, Result};

const ALERT_COLUMNS: &str =
    "id, symbol, name, kind, price, moving_average, volume, trade_date, triggered_at, status";

#[async_trait]
impl AlertStore for Db {
    async fn insert_alert(&self, alert: &NewAlert) -> Result<Option<Alert>> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO alerts (symbol, name, kind, price, moving_average, volume, trade_date, triggered_at, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (symbol, kind, trade_date) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&alert.symbol.0)
        .bind(&alert.name)
        .bind(alert.kind.as_str())
        .bind(alert.price.to_string())
        .bind(alert.moving_average.to_string())
        .bind(alert.volume as i64)
        .bind(alert.trade_date)
        .bind(alert.triggered_at)
        .bind(AlertStatus::Unhandled.as_str())
        .fetch_optional(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        match inserted {
            Some(row) => {
                let id: i64 = row.try_get("id").map_err(Error::OperationFailed)?;
                Ok(Some(Alert::from_new(id, alert.clone())))
            }
            None => {
                tracing::debug!(symbol = %alert.symbol, kind = %alert.kind, trade_date = %alert.trade_date, "Alert already stored.");
                Ok(None)
            }
        }
    }

    async fn find_alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE 1 = 1"));

        if let Some(symbol) = &query.symbol {
            builder.push(" AND symbol = ").push_bind(symbol.0.clone());
        }
        if let Some(kind) = query.kind {
            builder.push(" AND kind = ").push_bind(kind.as_str());
        }
        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(from) = query.trade_date_from {
            builder.push(" AND trade_date >= ").push_bind(from);
        }
        if let Some(to) = query.trade_date_to {
            builder.push(" AND trade_date <= ").push_bind(to);
        }
        if let Some(at) = query.triggered_from {
            builder.push(" AND triggered_at >= ").push_bind(at);
        }
        builder.push(" ORDER BY triggered_at DESC, id DESC");
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let rows = builder
            .build()
            .fetch_all(&self.0)
            .await
            .map_err(Error::OperationFailed)?;

        rows.iter().map(alert_from_row).collect()
    }

    async fn acknowledge_alert(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE alerts SET status = ? WHERE id = ? AND status = ?")
            .bind(AlertStatus::Acknowledged.as_str())
            .bind(id)
            .bind(AlertStatus::Unhandled.as_str())
            .execute(&self.0)
            .await
            .map_err(Error::OperationFailed)?;

        Ok(result.rows_affected() > 0)
    }
}

fn alert_from_row(row: &SqliteRow) -> Result<Alert> {
    let symbol: String = row.try_get("symbol").map_err(Error::OperationFailed)?;
    let kind: String = row.try_get("kind").map_err(Error::OperationFailed)?;
    let status: String = row.try_get("status").map_err(Error::OperationFailed)?;
    let volume: i64 = row.try_get("volume").map_err(Error::OperationFailed)?;
    let trade_date: NaiveDate = row.try_get("trade_date").map_err(Error::OperationFailed)?;
    let triggered_at: DateTime<Utc> =
        row.try_get("triggered_at").map_err(Error::OperationFailed)?;

    Ok(Alert {
        id: row.try_get("id").map_err(Error::OperationFailed)?,
        symbol: Symbol(symbol),
        name: row.try_get("name").map_err(Error::OperationFailed)?,
        kind: kind
            .parse::<AlertKind>()
            .map_err(|_| Error::CorruptRow { column: "kind", value: kind.clone() })?,
        price: decimal(row, "price")?,
        moving_average: decimal(row, "moving_average")?,
        volume: volume.max(0) as u64,
        trade_date,
        triggered_at,
        status: status
            .parse::<AlertStatus>()
            .map_err(|_| Error::CorruptRow { column: "status", value: status.clone() })?,
    })
}
