mod alert;
mod device;
mod folder;
mod remote;
mod snapshot;

pub use alert::{derive_alerts, Alert, AlertCode, Severity};
pub use device::{DeviceStatus, HealthRatio};
pub use folder::{FolderState, FolderStatus};
pub use remote::RemoteDeviceStatus;
pub use snapshot::DashboardSnapshot;
