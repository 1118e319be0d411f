//! Credential management commands.
//!
//! The stored record is shared with the `run` command, which reads it
//! for auto-login and may rewrite it when the session state changes
//! (sign-out disables auto-login, repeated failures purge the record).
//!
//! # Examples
//!
//! ```bash
//! # Save credentials (prompts for anything omitted)
//! roost creds set --user student01
//!
//! # Inspect the stored record
//! roost creds show
//!
//! # Pause auto-login without forgetting the password
//! roost creds auto off
//!
//! # Forget everything
//! roost creds clear
//! ```

use anyhow::{Result, anyhow};
use console::Term;
use roost_core::{CredentialFile, CredentialPatch, CredentialRecord, PortalProfile};
use std::io::{self, Write};
use std::path::Path;

/// Save the user ID and password used for auto-login
pub fn set(
    home: &Path,
    user: Option<String>,
    password: Option<String>,
    no_auto_login: bool,
) -> Result<()> {
    let term = Term::stdout();

    let user_id = match user {
        Some(user) => user,
        None => {
            term.write_str("Portal user ID: ")?;
            term.read_line()?
        }
    };

    let password = match password {
        Some(password) => password,
        None => {
            term.write_str("Portal password: ")?;
            term.read_secure_line()?
        }
    };

    let record = CredentialRecord::new(user_id, password, !no_auto_login);
    if record.validate().is_err() {
        return Err(anyhow!("Please fill out both the user ID and password"));
    }

    let store = CredentialFile::in_home(home);
    store
        .save(&record)
        .map_err(|e| anyhow!("Failed to save login information: {}", e))?;

    println!("✅ Credentials saved for {}", record.user_id);
    if no_auto_login {
        println!("   Auto-login is off. Turn it on with: roost creds auto on");
    } else {
        println!("   Auto-login is on. The next run signs in automatically.");
    }

    Ok(())
}

/// Show the stored record
pub fn show(home: &Path, reveal: bool) -> Result<()> {
    let store = CredentialFile::in_home(home);

    let Some(record) = store.load() else {
        let portal = PortalProfile::load(&home.join(roost_core::PORTAL_FILE))?;
        println!("No credentials stored.");
        println!();
        println!("Save some with: roost creds set");
        println!("Need an account? {}", portal.signup_url);
        println!("Forgot your password? {}", portal.password_reminder_url);
        return Ok(());
    };

    println!("User ID:    {}", record.user_id);
    println!(
        "Password:   {}",
        if reveal { record.password.as_str() } else { "********" }
    );
    println!(
        "Auto-login: {}",
        if record.auto_login_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    if let Ok(metadata) = std::fs::metadata(store.path())
        && let Ok(modified) = metadata.modified()
    {
        let when: chrono::DateTime<chrono::Local> = modified.into();
        println!("Saved:      {}", when.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}

/// Switch automatic login on or off
pub fn auto(home: &Path, enable: bool) -> Result<()> {
    let store = CredentialFile::in_home(home);

    if store.load().is_none() {
        return Err(anyhow!(
            "No credentials stored. Save some first with: roost creds set"
        ));
    }

    store.patch(CredentialPatch::auto_login(enable))?;

    println!(
        "✅ Auto-login {}",
        if enable { "enabled" } else { "disabled" }
    );

    Ok(())
}

/// Delete the stored record
pub fn clear(home: &Path, force: bool) -> Result<()> {
    let store = CredentialFile::in_home(home);

    if !store.exists() {
        println!("No credentials stored.");
        return Ok(());
    }

    // Require confirmation
    if !force {
        print!("⚠️  This will delete the stored portal credentials.\nType 'delete' to confirm: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if input.trim() != "delete" {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    store.clear()?;
    println!("✅ Stored credentials deleted");

    Ok(())
}
