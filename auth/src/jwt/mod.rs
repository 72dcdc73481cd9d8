pub mod claims;
pub mod errors;
pub mod handler;
pub mod signer;

pub use claims::Claims;
pub use claims::Identity;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use signer::IssuedToken;
pub use signer::TokenClass;
pub use signer::TokenPair;
pub use signer::TokenSettings;
pub use signer::TokenSigner;
