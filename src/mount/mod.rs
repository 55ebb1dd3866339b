pub mod fstab;
pub mod inspect;
pub mod mountpoint;
pub mod ops;
pub mod reconcile;
