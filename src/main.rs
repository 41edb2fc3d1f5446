use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, warn};
use validator::Validate;

use dome_console::{
    batch::EntryMode,
    config,
    directory::LocationDirectory,
    import,
    label::{self, FilePrinter, PrintSink},
    models::{NewMeasurement, PersistedOrder},
    search::{OrderSearch, SearchFilters},
    shipper::ShipperResolver,
    workflow::{OrderEditor, OrderEntryWorkflow},
    ConsoleError, ServiceClient, TokenStore,
};

#[derive(Parser)]
#[command(name = "dome-console", version, about = "Order entry, search, and AWB label console")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a batch of orders imported from a spreadsheet
    Submit {
        /// Shipper ID to resolve and confirm
        #[arg(long)]
        shipper: String,
        /// Pickup date (YYYY-MM-DD), earliest tomorrow
        #[arg(long)]
        date: NaiveDate,
        /// Pickup state id
        #[arg(long)]
        state: i64,
        /// Pickup city id (must belong to the state)
        #[arg(long)]
        city: i64,
        /// Pickup street address
        #[arg(long, default_value = "")]
        address: String,
        /// Override the pickup contact name (defaults to the shipper's)
        #[arg(long)]
        name: Option<String>,
        /// Override the pickup contact phone (defaults to the shipper's)
        #[arg(long)]
        phone: Option<String>,
        /// Orders file (.xlsx, .xls or .csv)
        #[arg(long)]
        file: PathBuf,
    },
    /// List the recent orders
    Recent,
    /// Search order history
    Search {
        #[arg(long)]
        shipper: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Tracking ids, comma or space separated
        #[arg(long)]
        tracking: Option<String>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },
    /// Render AWB labels for one or more tracking ids
    Label {
        tracking_ids: Vec<String>,
        /// Output directory override for the rendered labels
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Edit a persisted order's customer/destination fields
    Edit {
        tracking_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        state: Option<i64>,
        #[arg(long)]
        city: Option<i64>,
        #[arg(long)]
        cod: Option<Decimal>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        delivery: Option<bool>,
    },
    /// Record a parcel measurement for an order
    Measure {
        tracking_id: String,
        #[arg(long)]
        kg: f64,
        #[arg(long)]
        cm: f64,
        #[arg(long)]
        order_id: i64,
        /// Already-captured parcel image references
        #[arg(long)]
        image: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let tokens = TokenStore::new();
    if let Some(token) = cfg.api_token.clone() {
        tokens.set(token);
    }
    let client = ServiceClient::new(&cfg, tokens).context("failed to build service client")?;

    match cli.command {
        Command::Submit {
            shipper,
            date,
            state,
            city,
            address,
            name,
            phone,
            file,
        } => {
            let directory = LocationDirectory::load(&client).await;
            let resolver = ShipperResolver::new(client.clone());
            let resolved = resolver.resolve(&shipper).await?;
            println!(
                "Shipper: {} / {} ({}, {})",
                resolved.name, resolved.phone, resolved.city_name, resolved.state_name
            );

            let mut workflow = OrderEntryWorkflow::new(client);
            workflow.pickup.select_shipper(resolved)?;
            workflow.pickup.choose_date(date)?;
            if let Some(name) = name {
                workflow.pickup.set_name(name)?;
            }
            if let Some(phone) = phone {
                workflow.pickup.set_phone(phone)?;
            }
            workflow.pickup.set_address(address)?;
            workflow.pickup.select_state(&directory, Some(state))?;
            workflow.pickup.select_city(&directory, city)?;
            workflow.pickup.create_order()?;

            let orders = import::import_file(&file)?;
            println!("Imported {} order(s) from {}", orders.len(), file.display());
            workflow.batch.set_mode(EntryMode::File);
            workflow.batch.load_file_orders(orders);

            workflow.submit().await?;
            println!("Order batch submitted.");
        }
        Command::Recent => {
            let orders = OrderSearch::new(client).search(&SearchFilters::default()).await?;
            print_orders(&orders);
        }
        Command::Search {
            shipper,
            name,
            phone,
            tracking,
            start_date,
            end_date,
        } => {
            let filters = SearchFilters {
                shipper_id: shipper,
                customer_name: name,
                phone,
                tracking_input: tracking,
                start_date,
                end_date,
            };
            let orders = OrderSearch::new(client).search(&filters).await?;
            if orders.is_empty() {
                println!("No orders found.");
            } else {
                print_orders(&orders);
            }
        }
        Command::Label { tracking_ids, out } => {
            if tracking_ids.is_empty() {
                return Err("Provide at least one tracking id.".into());
            }
            let mut orders = Vec::new();
            for tracking_id in &tracking_ids {
                match client.get_order(tracking_id).await {
                    Ok(order) => orders.push(order),
                    Err(e) => warn!(tracking_id = %tracking_id, error = %e, "skipping order"),
                }
            }

            let labels = label::render_batch(&client, &orders).await;
            let printer = FilePrinter::new(out.unwrap_or_else(|| PathBuf::from(&cfg.label_output_dir)));
            for label in &labels {
                printer.print(label, &label.to_html())?;
                println!(
                    "{} -> {}",
                    label.tracking_id,
                    printer.out_dir().join(format!("{}.html", label.tracking_id)).display()
                );
            }
            info!(count = labels.len(), "labels rendered");
        }
        Command::Edit {
            tracking_id,
            name,
            phone,
            address,
            state,
            city,
            cod,
            note,
            delivery,
        } => {
            let mut editor = OrderEditor::load(client, &tracking_id).await?;
            if let Some(name) = name {
                editor.set_customer_name(name);
            }
            if let Some(phone) = phone {
                editor.set_customer_phone(phone);
            }
            if let Some(address) = address {
                editor.set_customer_address(address);
            }
            if let Some(state) = state {
                editor.select_state(Some(state));
            }
            if let Some(city) = city {
                editor.select_city(city)?;
            }
            if let Some(cod) = cod {
                editor.set_cod(cod);
            }
            if let Some(note) = note {
                editor.set_note(note);
            }
            if let Some(delivery) = delivery {
                editor.set_delivery(delivery);
            }
            editor.submit().await?;
            println!("Order {} updated.", tracking_id);
        }
        Command::Measure {
            tracking_id,
            kg,
            cm,
            order_id,
            image,
        } => {
            let measurement = NewMeasurement {
                tracking_id: tracking_id.clone(),
                kg,
                cm,
                order_id,
                images: image,
            };
            measurement
                .validate()
                .map_err(ConsoleError::from)?;
            client.create_measurement(&measurement).await?;
            println!("Measurement recorded for {}.", tracking_id);
        }
    }

    Ok(())
}

fn print_orders(orders: &[PersistedOrder]) {
    for order in orders {
        let destination = order
            .destination_city
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("-");
        println!(
            "{}  {}  {}  {}  cod={}",
            order.tracking_id,
            order.cus_name,
            order.cus_phone,
            destination,
            order
                .cod
                .map(|c| c.to_string())
                .unwrap_or_else(|| "0".to_string()),
        );
    }
}
