pub mod account;
pub mod event;
pub mod gallery;
pub mod registration;

pub use account::{Account, AccountPublic, SessionToken};
pub use event::{Event, EventChanges, EventResponse, NewEvent};
pub use gallery::{GalleryChanges, GalleryImage, GalleryResponse, NewGalleryImage};
pub use registration::{NewRegistration, Registration, RegistrationChanges, RegistrationResponse};
