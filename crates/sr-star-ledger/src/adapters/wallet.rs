use crate::domain::value_objects::SignatureScheme;
use crate::ports::outbound::OwnershipVerifier;
use sr_signature_verification::{BitcoinMessageVerifier, SignatureError, WalletVerifier};

/// Ownership proof by wallet message signature.
///
/// With [`SignatureScheme::Bitcoin`] the identity must be a base58check P2PKH
/// address and the signature a base64 compact signature. With
/// [`SignatureScheme::Ethereum`] the identity is a hex address and the
/// signature a hex `personal_sign` signature. Either way the signature must
/// recover to the identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalletOwnershipVerifier {
    scheme: SignatureScheme,
    bitcoin: BitcoinMessageVerifier,
    ethereum: WalletVerifier,
}

impl WalletOwnershipVerifier {
    pub fn new(scheme: SignatureScheme) -> Self {
        Self {
            scheme,
            bitcoin: BitcoinMessageVerifier::new(),
            ethereum: WalletVerifier::new(),
        }
    }

    /// Bitcoin signed messages.
    pub fn bitcoin() -> Self {
        Self::new(SignatureScheme::Bitcoin)
    }

    /// `personal_sign` (EIP-191) messages.
    pub fn ethereum() -> Self {
        Self::new(SignatureScheme::Ethereum)
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }
}

impl OwnershipVerifier for WalletOwnershipVerifier {
    fn verify_ownership(
        &self,
        identity: &str,
        message: &str,
        signature: &str,
    ) -> Result<(), SignatureError> {
        match self.scheme {
            SignatureScheme::Bitcoin => self.bitcoin.verify_message(identity, message, signature),
            SignatureScheme::Ethereum => self.ethereum.verify_message(identity, message, signature),
        }
    }
}
