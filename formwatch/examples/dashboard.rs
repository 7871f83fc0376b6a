//! Dashboard Example
//!
//! Drives the company-info form the way a page binding would:
//! - types into each field, printing outcome and icon changes
//! - waits for the asynchronous description check
//! - submits and prints the final object as JSON
//!
//! Logs go to `dashboard.log` in the working directory.

use std::fs::File;

use formwatch::prelude::*;
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = File::create("dashboard.log")?;
    let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);

    let form = FormController::dashboard()?;

    for field in FieldId::ALL {
        let _ = form.subscribe_outcome(field, move |outcome| match outcome {
            FieldOutcome::Invalid { message } => println!("  {field}: invalid ({message})"),
            other => println!("  {field}: {other:?}"),
        });
        let _ = form.subscribe_display_state(field, move |state| {
            println!("  {field} icon: {}", state.icon_class());
        });
    }
    let _ = form.subscribe_group_validity(|validity| println!("  group: {validity:?}"));
    let _ = form.subscribe_group_display(|state| println!("  group icon: {}", state.icon_class()));

    let typing = [
        (FieldId::Name, "Ab"),
        (FieldId::Name, "ValidTeam01"),
        (FieldId::LongName, "Valid Team 01 Incorporated"),
        (FieldId::Description, "We validate forms."),
    ];
    for (field, value) in typing {
        println!("{field} <- {value:?}");
        form.on_field_input(field, value);
    }

    form.settled().await;

    let snapshot = form.submit();
    println!(
        "Final Object: {}",
        serde_json::to_string_pretty(&snapshot.submission())?
    );

    Ok(())
}
