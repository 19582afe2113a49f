pub mod crux_client;
pub mod psi_client;

pub use crux_client::CruxClient;
pub use psi_client::PsiClient;
