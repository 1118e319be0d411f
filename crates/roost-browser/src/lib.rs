mod chrome_finder;
mod error;
mod launcher;
mod profile;
mod surface;

pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use launcher::ChromeLauncher;
pub use profile::ProfileManager;
pub use surface::{MESSAGE_BINDING, PortalSurface, SurfaceEvent, SurfaceHandle};
