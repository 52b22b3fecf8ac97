mod session;
mod submitter;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use qissa_engine::{
    AdvanceOutcome, Catalog, CheckoutOutcome, FlowVariant, WizardController, checkout, load_catalog_file, plan,
};
use qissa_util::WizardSettings;
use tracing::{debug, info};

use crate::session::SessionScript;
use crate::submitter::StdoutSubmitter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let matches = build_cli().get_matches();
    let settings = WizardSettings::load().context("load settings")?;

    match matches.subcommand() {
        Some(("products", _)) => list_products(&load_catalog(&settings, &matches)?),
        Some(("plan", sub)) => print_plan(&load_catalog(&settings, &matches)?, product_arg(sub)?),
        Some(("quote", sub)) => quote(&load_catalog(&settings, &matches)?, &settings, sub),
        Some(("run", sub)) => run(&load_catalog(&settings, &matches)?, &settings, sub).await,
        _ => bail!("expected a subcommand; see --help"),
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_cli() -> Command {
    let product = Arg::new("product")
        .long("product")
        .short('p')
        .action(ArgAction::Set)
        .required(true)
        .help("Product key from the catalog");
    let session = Arg::new("session")
        .long("session")
        .short('s')
        .action(ArgAction::Set)
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("Path to a JSON session script");

    Command::new("qissa")
        .about("Configure personalized story products")
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .global(true)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Catalog document (YAML or JSON); overrides settings and QISSA_CATALOG_PATH"),
        )
        .subcommand(Command::new("products").about("List catalog products"))
        .subcommand(
            Command::new("plan")
                .about("Print the planned wizard steps for a product")
                .arg(product.clone()),
        )
        .subcommand(
            Command::new("quote")
                .about("Apply a session script and print the live price")
                .arg(product.clone())
                .arg(session.clone()),
        )
        .subcommand(
            Command::new("run")
                .about("Apply a session script, walk every step, and submit the order")
                .arg(product)
                .arg(session),
        )
}

fn load_catalog(settings: &WizardSettings, matches: &ArgMatches) -> Result<Catalog> {
    let flag = matches.get_one::<PathBuf>("catalog").map(PathBuf::as_path);
    let path = settings.resolve_catalog_path(flag);
    debug!(path = %path.display(), "Loading catalog");
    load_catalog_file(&path).with_context(|| format!("load catalog {}", path.display()))
}

fn product_arg(matches: &ArgMatches) -> Result<&str> {
    matches
        .get_one::<String>("product")
        .map(String::as_str)
        .context("missing --product")
}

fn session_arg(matches: &ArgMatches) -> Result<SessionScript> {
    let path = matches.get_one::<PathBuf>("session").context("missing --session")?;
    SessionScript::load(path)
}

fn list_products(catalog: &Catalog) -> Result<()> {
    for schema in catalog.products() {
        let flow = match FlowVariant::for_product(&schema.key) {
            FlowVariant::Default => "default",
            FlowVariant::Emotion => "emotion",
        };
        let kind = if schema.is_addon { "addon" } else { "product" };
        let delivery = if schema.has_printed_version {
            "printed+electronic"
        } else {
            "electronic"
        };
        println!("{}\t{}\t{}\t{}\t{}", schema.key, schema.display_title(), kind, flow, delivery);
    }
    Ok(())
}

fn print_plan(catalog: &Catalog, product_key: &str) -> Result<()> {
    if catalog.schema(product_key).is_none() {
        bail!("unknown product '{}'", product_key);
    }
    println!("{}", serde_json::to_string_pretty(&plan(product_key))?);
    Ok(())
}

fn start_session(catalog: &Catalog, settings: &WizardSettings, matches: &ArgMatches) -> Result<WizardController> {
    let product_key = product_arg(matches)?;
    let script = session_arg(matches)?;
    let mut wizard = WizardController::new(product_key, catalog, script.account_context(settings))?;
    script.start(&mut wizard).context("apply session script")?;
    Ok(wizard)
}

fn quote(catalog: &Catalog, settings: &WizardSettings, matches: &ArgMatches) -> Result<()> {
    let wizard = start_session(catalog, settings, matches)?;
    let out = serde_json::json!({
        "product": wizard.product_key(),
        "currency": settings.currency,
        "breakdown": wizard.price_breakdown(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

async fn run(catalog: &Catalog, settings: &WizardSettings, matches: &ArgMatches) -> Result<()> {
    let mut wizard = start_session(catalog, settings, matches)?;

    let last_step = wizard.steps().len() - 1;
    while wizard.current_step_index().is_some_and(|index| index < last_step) {
        if let AdvanceOutcome::Blocked { step_key, errors } = wizard.advance()? {
            return report_blocked(&step_key, &errors);
        }
    }

    match checkout(wizard, &StdoutSubmitter).await? {
        CheckoutOutcome::Accepted { payload, receipt } => {
            info!(reference = %receipt.reference, total = %payload.price_breakdown.total, currency = %settings.currency, "Order submitted");
            Ok(())
        }
        CheckoutOutcome::Incomplete { step_key, errors, .. } => report_blocked(&step_key, &errors),
    }
}

fn report_blocked(step_key: &str, errors: &qissa_types::ErrorMap) -> Result<()> {
    let out = serde_json::json!({
        "step": step_key,
        "notice": qissa_engine::wizard::REQUIRED_FIELDS_NOTICE,
        "errors": errors,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    bail!("wizard blocked on step '{}'", step_key)
}
