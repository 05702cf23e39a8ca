// Application layer - Use case interactors

pub mod container;
pub mod inspect_interactor;
pub mod playlist_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use inspect_interactor::{InspectFormat, InspectInteractor, InspectRequest, InspectResponse};
pub use playlist_interactor::PlaylistInteractor;
