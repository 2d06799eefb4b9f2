//! SQLite persistence for scraped sailings.
//!
//! The scraping engine only emits the freshly scraped set; how that set
//! replaces previously stored rows is decided here, driven by an explicit
//! `RefreshPolicy` from configuration.

use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::timetable::Sailing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Wipe every stored sailing, then insert the fresh batch.
    ReplaceAll,
    /// Wipe only the sailings of companies present in the fresh batch, so
    /// an operator that failed this cycle keeps its previous schedule.
    ReplaceCompany,
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS sailings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    departure TEXT NOT NULL,
    origin TEXT NOT NULL,
    destination TEXT NOT NULL,
    company TEXT NOT NULL
)";

pub struct TimetableStore {
    pool: SqlitePool,
}

impl TimetableStore {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Swap stored sailings for the fresh batch in one transaction.
    pub async fn replace(&self, sailings: &[Sailing], policy: RefreshPolicy) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        match policy {
            RefreshPolicy::ReplaceAll => {
                sqlx::query("DELETE FROM sailings").execute(&mut *tx).await?;
            }
            RefreshPolicy::ReplaceCompany => {
                let mut companies: Vec<&str> =
                    sailings.iter().map(|s| s.company.as_str()).collect();
                companies.sort_unstable();
                companies.dedup();
                for company in companies {
                    sqlx::query("DELETE FROM sailings WHERE company = ?")
                        .bind(company)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }

        for sailing in sailings {
            sqlx::query(
                "INSERT INTO sailings (departure, origin, destination, company) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(sailing.departure)
            .bind(&sailing.origin)
            .bind(&sailing.destination)
            .bind(&sailing.company)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// The next boat leaving `origin` after the given local time.
    pub async fn next_departure(
        &self,
        origin: &str,
        after: NaiveDateTime,
    ) -> anyhow::Result<Option<Sailing>> {
        let sailing = sqlx::query_as::<_, Sailing>(
            "SELECT departure, origin, destination, company FROM sailings \
             WHERE origin = ? AND departure > ? ORDER BY departure LIMIT 1",
        )
        .bind(origin)
        .bind(after)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sailing)
    }

    /// All departures on `day`, optionally filtered by origin, ascending.
    pub async fn departures_on(
        &self,
        day: NaiveDate,
        origin: Option<&str>,
    ) -> anyhow::Result<Vec<Sailing>> {
        let start = day.and_time(NaiveTime::MIN);
        let end = (day + Days::new(1)).and_time(NaiveTime::MIN);

        let sailings = match origin {
            Some(origin) => {
                sqlx::query_as::<_, Sailing>(
                    "SELECT departure, origin, destination, company FROM sailings \
                     WHERE origin = ? AND departure >= ? AND departure < ? \
                     ORDER BY departure",
                )
                .bind(origin)
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Sailing>(
                    "SELECT departure, origin, destination, company FROM sailings \
                     WHERE departure >= ? AND departure < ? ORDER BY departure",
                )
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(sailings)
    }
}
