use propconnect_client::PrincipalKind;
use propconnect_store::Store;

use crate::error::{ViewError, ViewResult};

/// Token of the signed-in principal when it is of `kind`.
pub(crate) fn token_for(store: &Store, kind: PrincipalKind) -> ViewResult<String> {
    store
        .select(|state| state.auth.principal.session())
        .and_then(|(current, token)| (current == kind).then_some(token))
        .ok_or(ViewError::NotAuthorized)
}
