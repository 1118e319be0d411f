use anyhow::Result;
use roost_browser::{
    ChromeFinder, ChromeLauncher, MESSAGE_BINDING, PortalSurface, ProfileManager, SurfaceEvent,
    SurfaceHandle,
};
use roost_core::{CredentialFile, CredentialPatch, PortalProfile};
use roost_session::{
    AutoLoginTracker, Effect, Gate, MAX_LOGIN_ATTEMPTS, NavClassifier, ScriptBuilder,
    SessionStatus,
};
use std::path::{Path, PathBuf};

/// Kill a process by PID (cross-platform)
fn kill_process_by_pid(pid: u32) {
    #[cfg(unix)]
    {
        use std::process::Command;
        // Use kill command to send SIGTERM
        let _ = Command::new("kill").arg(pid.to_string()).output();
    }

    #[cfg(windows)]
    {
        use std::process::Command;
        let _ = Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/F"])
            .output();
    }
}

pub fn execute(
    home: &Path,
    chrome_path: Option<PathBuf>,
    profile: Option<String>,
    temp: bool,
    url: Option<String>,
) -> Result<()> {
    // Create tokio runtime for async operations
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(watch_session(home, chrome_path, profile, temp, url));

    // Explicitly shutdown runtime with timeout to prevent hanging on blocking tasks
    runtime.shutdown_timeout(std::time::Duration::from_millis(100));

    result
}

enum Action {
    ChromeExited,
    Quit,
    KillChrome,
}

#[derive(PartialEq)]
enum Flow {
    Continue,
    Lockout,
}

async fn watch_session(
    home: &Path,
    chrome_path: Option<PathBuf>,
    profile: Option<String>,
    temp: bool,
    url: Option<String>,
) -> Result<()> {
    // Step 1: Load the portal profile and stored credentials
    let portal = PortalProfile::load(&home.join(roost_core::PORTAL_FILE))?;
    let store = CredentialFile::in_home(home);
    let record = store.load();

    match SessionStatus::at_rest(record.as_ref()).gate() {
        Gate::Main => {
            let auto = record.as_ref().is_some_and(|r| r.auto_login_enabled);
            println!(
                "🔐 Credentials stored, auto-login {}",
                if auto { "on" } else { "off" }
            );
        }
        Gate::AuthFlow => {
            println!("👋 No stored credentials - the portal will ask you to sign in.");
            println!("   Save credentials with: roost creds set");
            println!("   Need an account? {}", portal.signup_url);
        }
    }

    // Step 2: Find Chrome binary
    println!("🔍 Locating Chrome...");
    let finder = ChromeFinder::new(chrome_path);
    let chrome_binary = finder.find()?;
    println!("✅ Found Chrome at: {}", chrome_binary.display());

    // Step 3: Setup profile
    let profile_manager = if temp {
        if profile.is_some() {
            println!("⚠️  --temp overrides --profile");
        }
        println!("📁 Using temporary profile");
        ProfileManager::temporary()?
    } else {
        let name = profile.as_deref().unwrap_or("default");
        let manager = ProfileManager::named(home, name)?;
        println!("📁 Using profile: {}", manager.path().display());
        manager
    };

    // Step 4: Launch Chrome at the portal
    let start_url = url.unwrap_or_else(|| portal.base_url.clone());
    let launcher = ChromeLauncher::new(
        chrome_binary,
        profile_manager.path().to_path_buf(),
        Some(start_url.clone()),
    );
    let debugging_port = launcher.debugging_port();

    println!("🚀 Launching Chrome...");
    let mut chrome_process = launcher.launch()?;
    let chrome_pid = chrome_process.id();
    println!("✅ Chrome started successfully");
    println!("📍 Starting at: {}", start_url);

    // Step 5: Attach to the page over CDP
    let surface = PortalSurface::new(debugging_port);
    let (handle, mut events) = surface.attach().await?;

    // Reload once so the first navigation flows through our own listeners
    handle.reload().await?;

    // Step 6: Session machinery
    let classifier = NavClassifier::for_portal(&portal);
    let mut tracker = AutoLoginTracker::new(record);
    let script_builder = ScriptBuilder::new(&portal, MESSAGE_BINDING);

    println!("👀 Watching the portal session...");
    println!();
    println!("  q) Quit roost (Chrome stays open)");
    println!("  k) Quit and close Chrome");
    println!();

    // Step 7: Pump surface events until Chrome exits or the user quits
    use console::Term;

    let mut input_task = tokio::task::spawn_blocking(move || {
        let term = Term::stdout();
        term.read_char()
    });

    let wait_task = tokio::task::spawn_blocking(move || chrome_process.wait());
    let mut wait_task = Some(wait_task);

    let mut events_open = true;

    let action = loop {
        tokio::select! {
            // Chrome exits naturally
            result = wait_task.as_mut().unwrap() => {
                let status = result??;
                let exit_code = status.code().unwrap_or(-1);
                println!("\n🛑 Chrome closed (exit code: {})", exit_code);
                wait_task = None;
                break Action::ChromeExited;
            }

            // User presses a key
            result = &mut input_task => {
                let key = result??;
                match key.to_lowercase().next().unwrap_or(' ') {
                    'q' => {
                        println!("\n👋 Leaving Chrome open...");
                        break Action::Quit;
                    }
                    'k' => {
                        println!("\n🛑 Closing Chrome...");
                        break Action::KillChrome;
                    }
                    other => {
                        println!("\n⚠️  Unknown key '{}'. Press q to quit or k to close Chrome.", other);
                        input_task = tokio::task::spawn_blocking(move || {
                            let term = Term::stdout();
                            term.read_char()
                        });
                    }
                }
            }

            // Activity on the portal page
            event = events.recv(), if events_open => {
                match event {
                    Some(event) => {
                        let flow = on_surface_event(
                            event,
                            &classifier,
                            &mut tracker,
                            &script_builder,
                            &store,
                            &portal,
                            &handle,
                        )
                        .await?;
                        if flow == Flow::Lockout {
                            break Action::Quit;
                        }
                    }
                    None => {
                        tracing::debug!("Surface event stream ended");
                        events_open = false;
                    }
                }
            }
        }
    };

    // Step 8: Handle the action
    match action {
        Action::Quit => {
            if let Some(task) = wait_task.take() {
                task.abort();
            }
            handle.shutdown();
            println!("✅ Roost stopped - Chrome continues running");
        }
        Action::KillChrome => {
            kill_process_by_pid(chrome_pid);
            println!("⏳ Waiting for Chrome to terminate...");
            if let Some(task) = wait_task.take() {
                let status = task.await??;
                println!("✅ Chrome stopped (exit code: {})", status.code().unwrap_or(-1));
            }
            handle.shutdown();
        }
        Action::ChromeExited => {
            handle.shutdown();
        }
    }

    // Step 9: Session summary
    let status = SessionStatus::project(store.load().as_ref(), &tracker);
    println!();
    if status.has_credentials {
        if status.auto_login_enabled {
            println!("📊 Next run signs in automatically");
        } else {
            println!("📊 Credentials stored, auto-login off");
        }
    } else {
        println!("📊 No stored credentials; next run starts at the sign-in screen");
    }

    Ok(())
}

/// React to one surface event: classify it, advance the tracker, and
/// perform whatever effects it asks for.
async fn on_surface_event(
    event: SurfaceEvent,
    classifier: &NavClassifier,
    tracker: &mut AutoLoginTracker,
    script_builder: &ScriptBuilder<'_>,
    store: &CredentialFile,
    portal: &PortalProfile,
    handle: &SurfaceHandle,
) -> Result<Flow> {
    match event {
        SurfaceEvent::Navigated(url) => {
            let nav = classifier.classify(&url);
            let effects = tracker.observe(nav);
            Ok(apply_effects(effects, store, portal))
        }
        SurfaceEvent::Loaded => {
            // Fill the form when auto-login applies; otherwise still hook
            // the logout link so we hear about sign-outs
            let script = match tracker.should_autofill() {
                Some(record) => script_builder.autofill(record)?,
                None => script_builder.logout_hook()?,
            };
            if let Err(e) = handle.inject(&script).await {
                tracing::warn!("Script injection failed: {}", e);
            }
            Ok(Flow::Continue)
        }
        SurfaceEvent::Message(payload) => match classifier.classify_message(&payload) {
            Some(nav) => {
                let effects = tracker.observe(nav);
                Ok(apply_effects(effects, store, portal))
            }
            None => Ok(Flow::Continue),
        },
    }
}

fn apply_effects(effects: Vec<Effect>, store: &CredentialFile, portal: &PortalProfile) -> Flow {
    let mut flow = Flow::Continue;

    for effect in effects {
        match effect {
            Effect::PurgeCredentials => {
                if let Err(e) = store.clear() {
                    tracing::warn!("Failed to purge credentials: {}", e);
                }
            }
            Effect::DisableAutoLogin => {
                if let Err(e) = store.patch(CredentialPatch::auto_login(false)) {
                    tracing::warn!("Failed to disable auto-login: {}", e);
                }
            }
            Effect::NotifyLockout => {
                println!();
                println!(
                    "❌ Auto-login failed {} times in a row.",
                    MAX_LOGIN_ATTEMPTS
                );
                println!("   The stored credentials were deleted. Check them and run: roost creds set");
                println!("   Forgot your password? {}", portal.password_reminder_url);
                flow = Flow::Lockout;
            }
            Effect::ShowAuthFlow => {
                println!();
                println!("👋 Signed out. Auto-login is now off.");
                println!("   Turn it back on with: roost creds auto on");
            }
        }
    }

    flow
}
