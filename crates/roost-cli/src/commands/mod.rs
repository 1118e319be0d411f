pub mod completion;
pub mod creds;
pub mod portal;
pub mod run;
pub mod status;
