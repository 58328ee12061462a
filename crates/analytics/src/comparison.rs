use chrono::{Days, NaiveDate};
use core_types::columns::ORDER_DATE;
use data_store::SalesTable;

/// The inclusive date range immediately preceding the current selection.
///
/// The window spans as many calendar days as the current table, measured from
/// its earliest to its latest order date (at least one day). `None` when the
/// current table has no valid dates.
pub fn comparison_bounds(current: &SalesTable) -> Option<(NaiveDate, NaiveDate)> {
    let (start, end) = current.date_bounds()?;
    let period_days = ((end - start).num_days() + 1).max(1) as u64;
    let prev_end = start.checked_sub_days(Days::new(1))?;
    let prev_start = prev_end.checked_sub_days(Days::new(period_days - 1))?;
    Some((prev_start, prev_end))
}

/// Returns the rows of `full` that fall in the comparison window of `current`.
///
/// An empty table means "insufficient history", never an error.
pub fn build_comparison_window(current: &SalesTable, full: &SalesTable) -> SalesTable {
    if current.is_empty()
        || full.is_empty()
        || !current.has_column(ORDER_DATE)
        || !full.has_column(ORDER_DATE)
    {
        return full.empty_like();
    }

    let Some((prev_start, prev_end)) = comparison_bounds(current) else {
        return full.empty_like();
    };

    let window = full.retain_where(|r| {
        r.order_date
            .is_some_and(|d| d >= prev_start && d <= prev_end)
    });
    tracing::debug!(
        %prev_start,
        %prev_end,
        rows = window.len(),
        "Built comparison window."
    );
    window
}
