use crate::OutputFormat;
use anyhow::Result;
use roost_core::CredentialFile;
use roost_session::{Gate, SessionStatus};
use std::path::Path;

pub fn execute(home: &Path, format: OutputFormat) -> Result<()> {
    let store = CredentialFile::in_home(home);
    let record = store.load();
    let status = SessionStatus::at_rest(record.as_ref());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Pretty => {
            match &record {
                Some(record) => println!("Credentials:  stored for {}", record.user_id),
                None => println!("Credentials:  none stored"),
            }
            println!(
                "Auto-login:   {}",
                if status.auto_login_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            match status.gate() {
                Gate::Main => println!("Next run:     opens the portal directly"),
                Gate::AuthFlow => println!("Next run:     starts at the sign-in screen"),
            }
            println!("Store:        {}", store.path().display());
        }
    }

    Ok(())
}
