use crate::OutputFormat;
use anyhow::{Result, anyhow};
use roost_core::PortalProfile;
use std::path::Path;

/// Show the effective portal profile
pub fn show(home: &Path, format: OutputFormat) -> Result<()> {
    let path = home.join(roost_core::PORTAL_FILE);
    let portal = PortalProfile::load(&path)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&portal)?);
        }
        OutputFormat::Pretty => {
            if path.exists() {
                println!("Portal file: {}", path.display());
            } else {
                println!("Portal file: {} (not found, using defaults)", path.display());
            }
            println!();
            println!("Base URL:       {}", portal.base_url);
            println!("Home marker:    {}", portal.home_fragment);
            println!("Login marker:   {}", portal.login_fragment);
            println!("Logout marker:  {}", portal.logout_fragment);
            println!("User field:     {}", portal.user_field_id);
            println!("Password field: {}", portal.password_field_id);
            println!("Submit control: {}", portal.submit_control_id);
            println!("Submit delay:   {} ms", portal.submit_delay_ms);
            println!("Logout link:    {}", portal.logout_link_selector);
            println!("Sign up:        {}", portal.signup_url);
            println!("Password help:  {}", portal.password_reminder_url);
        }
    }

    Ok(())
}

/// Write the default portal profile so it can be edited
pub fn init(home: &Path, force: bool) -> Result<()> {
    let path = home.join(roost_core::PORTAL_FILE);

    if path.exists() && !force {
        return Err(anyhow!(
            "Portal file already exists: {}. Use --force to overwrite.",
            path.display()
        ));
    }

    let portal = PortalProfile::default();
    portal.write(&path)?;

    println!("✅ Portal file written to: {}", path.display());
    println!("   Edit it to point roost at a different portal.");

    Ok(())
}
