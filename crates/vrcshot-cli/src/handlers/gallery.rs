use anyhow::Result;

use vrcshot_runtime::{GroupPage, QueryService, TimeWindow};
use vrcshot_types::format_store_timestamp;

use crate::args::OutputFormat;
use crate::context::ExecutionContext;
use crate::output::{parse_window_bound, render_groups_plain, render_json};

fn window(since: Option<&str>, until: Option<&str>) -> Result<TimeWindow> {
    Ok(TimeWindow {
        start: since.map(|s| parse_window_bound(s, false)).transpose()?,
        end: until.map(|u| parse_window_bound(u, true)).transpose()?,
    })
}

pub fn list(
    ctx: &ExecutionContext,
    format: OutputFormat,
    since: Option<String>,
    until: Option<String>,
    limit: usize,
    offset: usize,
) -> Result<()> {
    let db = ctx.open_db()?;
    let query = QueryService::new(&db);

    let groups = query.list_photo_groups(
        window(since.as_deref(), until.as_deref())?,
        GroupPage {
            offset,
            limit: Some(limit),
        },
    )?;

    match format {
        OutputFormat::Plain => render_groups_plain(&groups),
        OutputFormat::Json => render_json(&groups)?,
    }
    Ok(())
}

pub fn count(
    ctx: &ExecutionContext,
    format: OutputFormat,
    since: Option<String>,
    until: Option<String>,
) -> Result<()> {
    let db = ctx.open_db()?;
    let query = QueryService::new(&db);
    let count = query.count_photos(window(since.as_deref(), until.as_deref())?)?;

    match format {
        OutputFormat::Plain => println!("{}", count),
        OutputFormat::Json => render_json(&serde_json::json!({ "photos": count }))?,
    }
    Ok(())
}

pub fn players(ctx: &ExecutionContext, format: OutputFormat, joined_at: &str) -> Result<()> {
    let joined_at = vrcshot_types::parse_store_timestamp(joined_at)?;
    let db = ctx.open_db()?;
    let query = QueryService::new(&db);
    let players = query.players_for_session(joined_at)?;

    match format {
        OutputFormat::Plain => {
            if players.is_empty() {
                println!("No players logged for this session.");
            }
            for player in &players {
                let left = player
                    .left_at
                    .map(|ts| format_store_timestamp(ts))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}  joined {}  left {}",
                    player.player_name,
                    format_store_timestamp(player.joined_at),
                    left
                );
            }
        }
        OutputFormat::Json => render_json(&players)?,
    }
    Ok(())
}
