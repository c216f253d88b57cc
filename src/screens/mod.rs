pub mod status;

pub use status::{Modal, ModalBody, Route, StatusScreen};
