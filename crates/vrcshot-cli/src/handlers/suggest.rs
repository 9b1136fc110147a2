use anyhow::Result;

use vrcshot_runtime::QueryService;

use crate::args::OutputFormat;
use crate::context::ExecutionContext;
use crate::output::render_json;

pub fn worlds(
    ctx: &ExecutionContext,
    format: OutputFormat,
    prefix: &str,
    limit: usize,
) -> Result<()> {
    let db = ctx.open_db()?;
    let names = QueryService::new(&db).suggest_world_names(prefix, limit)?;
    render_names(format, &names)
}

pub fn players(
    ctx: &ExecutionContext,
    format: OutputFormat,
    prefix: &str,
    limit: usize,
) -> Result<()> {
    let db = ctx.open_db()?;
    let names = QueryService::new(&db).suggest_player_names(prefix, limit)?;
    render_names(format, &names)
}

fn render_names(format: OutputFormat, names: &[String]) -> Result<()> {
    match format {
        OutputFormat::Plain => {
            for name in names {
                println!("{}", name);
            }
        }
        OutputFormat::Json => render_json(&names)?,
    }
    Ok(())
}
