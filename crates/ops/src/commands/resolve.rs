use agency_core::relative_date::{describe_offset, parse_relative, MonthPolicy};
use agency_core::types::CalendarDate;

use crate::cli::ResolveArgs;

/// Resolve `args.offset` against `args.start` and describe the outcome.
///
/// Returns `Err` with a human-readable line when the offset text does not
/// parse or leaves the supported date range.
pub fn resolve_line(
    start: CalendarDate,
    offset: &str,
    policy: MonthPolicy,
) -> Result<String, String> {
    let parsed = parse_relative(offset).ok_or_else(|| format!("Unrecognised offset '{offset}'"))?;
    let resolved = parsed
        .apply(start, policy)
        .ok_or_else(|| format!("'{offset}' from {start} is outside the supported date range"))?;
    let days = (resolved - start).num_days();
    let label = i32::try_from(days)
        .map(describe_offset)
        .unwrap_or_else(|_| format!("{days} days"));
    Ok(format!("{resolved} ({label} after {start})"))
}

pub fn run(args: &ResolveArgs, policy: MonthPolicy) -> i32 {
    match resolve_line(args.start, &args.offset, policy) {
        Ok(line) => {
            println!("{line}");
            0
        }
        Err(message) => {
            tracing::warn!(offset = %args.offset, "{message}");
            eprintln!("{message}");
            1
        }
    }
}
