use chrono::NaiveDate;

use crate::error::Result;
use crate::models::date_range::DateRange;
use crate::service::page_service::RecordSubmitter;

/// Title for the `index`-th (0-based) page of a series.
pub fn recurring_title(title: &str, index: usize, title_increment: bool) -> String {
    if title_increment {
        format!("{} {}", title, index + 1)
    } else {
        title.to_string()
    }
}

/// Submits one record per date, in order, one at a time. Stops at the first
/// failure; records already created are left in place.
///
/// Returns the number of records created.
pub async fn submit_recurring(
    submitter: &dyn RecordSubmitter,
    title: &str,
    title_increment: bool,
    start: NaiveDate,
    end: NaiveDate,
    interval_days: i64,
) -> Result<usize> {
    let range = DateRange::new(start, end, interval_days)?;
    let dates = range.dates();
    tracing::info!(
        count = dates.len(),
        start = %range.start(),
        end = %range.end(),
        interval_days = range.interval_days(),
        "submitting recurring pages"
    );

    for (index, date) in dates.iter().enumerate() {
        let page_title = recurring_title(title, index, title_increment);
        if let Err(err) = submitter.submit_one(&page_title, *date).await {
            tracing::error!(
                submitted = index,
                remaining = dates.len() - index,
                %date,
                title = %page_title,
                "aborting recurring submission: {}",
                err
            );
            return Err(err);
        }
        tracing::debug!(%date, title = %page_title, "submitted");
    }

    Ok(dates.len())
}
