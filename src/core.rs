#[cfg(feature = "usubscription")]
pub mod usubscription;
