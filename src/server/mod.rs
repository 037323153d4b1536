pub mod advisor;
pub mod catalog;
pub mod check;
pub mod offer;
pub mod version;

pub use advisor::{AdvisoryInput, UpgradeAdvisor, UpgradeDecision};
pub use catalog::{SnapshotCatalog, SnapshotSource};
pub use check::check_server_version;
pub use offer::{Notifier, UpgradeChoice, UpgradeIntent, UpgradeOffer};
pub use version::ServerVersion;
