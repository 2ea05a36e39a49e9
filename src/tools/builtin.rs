//! Built-in tools for the calendar agent.

use std::sync::Arc;

use chrono::{FixedOffset, Utc};

use crate::error::ParleyError;
use crate::tools::tool::{AgentTool, Tool, ToolExecutionContext};
use crate::tools::types::AgentToolParameters;

/// Largest UTC offset any real timezone uses.
const MAX_OFFSET_HOURS: f64 = 14.0;

/// Create the `current_datetime` tool: the current date, time and weekday.
///
/// Takes an optional `utc_offset_hours` (e.g. `-3`, `5.5`); defaults to UTC.
pub fn current_datetime_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "current_datetime",
        "Get the current date, time and weekday, optionally shifted to a UTC offset in hours",
        AgentToolParameters::object()
            .number(
                "utc_offset_hours",
                "Offset from UTC in hours, e.g. -3 or 5.5. Defaults to 0.",
                false,
            )
            .build(),
        |args, _ctx: ToolExecutionContext| async move {
            let hours = args.get_f64_opt("utc_offset_hours").unwrap_or(0.0);
            if !hours.is_finite() || hours.abs() > MAX_OFFSET_HOURS {
                return Err(ParleyError::InvalidArgument(format!(
                    "utc_offset_hours out of range: {hours}"
                )));
            }
            let seconds = (hours * 3600.0).round() as i32;
            let offset = FixedOffset::east_opt(seconds).ok_or_else(|| {
                ParleyError::InvalidArgument(format!("invalid utc offset: {hours}"))
            })?;
            let now = Utc::now().with_timezone(&offset);
            Ok(serde_json::json!({
                "date": now.format("%Y-%m-%d").to_string(),
                "time": now.format("%H:%M:%S").to_string(),
                "weekday": now.format("%A").to_string(),
                "utc_offset": now.format("%:z").to_string(),
            }))
        },
    ))
}

/// All built-in tools.
pub fn all_tools() -> Vec<Arc<dyn Tool>> {
    vec![current_datetime_tool()]
}
