// ==========================================
// 咖啡售货亭配置器 - 运维命令行
// ==========================================
// 用法:
//   coffeezone-configurator init-db
//   coffeezone-configurator export <kind> <file>
//   coffeezone-configurator import <kind> <file>
//   coffeezone-configurator snapshot [base_url]
//
// kind 为表名（coffee_machines / fridges / cabinets / terminals /
// cabinet_colors / design_colors），文件格式按扩展名（.xlsx / .csv）
// ==========================================

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};

use coffeezone_configurator::config::AppSettings;
use coffeezone_configurator::domain::types::EntityKind;
use coffeezone_configurator::{i18n, logging, AppState};

const USAGE: &str = "usage: coffeezone-configurator <init-db | export <kind> <file> | import <kind> <file> | snapshot [base_url]>";

fn parse_kind(arg: Option<String>) -> anyhow::Result<EntityKind> {
    let raw = arg.ok_or_else(|| anyhow!("缺少 kind 参数\n{}", USAGE))?;
    raw.parse::<EntityKind>().map_err(|e| anyhow!(e))
}

fn parse_path(arg: Option<String>) -> anyhow::Result<PathBuf> {
    arg.map(PathBuf::from)
        .ok_or_else(|| anyhow!("缺少 file 参数\n{}", USAGE))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let settings = AppSettings::from_env();
    i18n::set_locale(&settings.locale);

    tracing::info!("{} v{}", coffeezone_configurator::APP_NAME, coffeezone_configurator::VERSION);

    let mut args = std::env::args().skip(1);
    let command = args.next().ok_or_else(|| anyhow!(USAGE))?;

    let state = AppState::new(settings).map_err(|e| anyhow!(e))?;

    match command.as_str() {
        "init-db" => {
            println!("db={}", state.settings.db_path);
        }
        "export" => {
            let kind = parse_kind(args.next())?;
            let path = parse_path(args.next())?;
            let rows = state
                .transfer_api
                .export_file(kind, &path)
                .with_context(|| format!("导出 {} 失败", kind))?;
            println!("rows={}", rows);
        }
        "import" => {
            let kind = parse_kind(args.next())?;
            let path = parse_path(args.next())?;
            let summary = state
                .transfer_api
                .import_file(kind, &path)
                .await
                .with_context(|| format!("导入 {} 失败", kind))?;
            println!("{}", serde_json::to_string(&summary)?);
        }
        "snapshot" => {
            let base_url = args
                .next()
                .unwrap_or_else(|| state.base_url().to_string());
            let snapshot = state.catalog_api.snapshot(&base_url)?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }

    Ok(())
}
