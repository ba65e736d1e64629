//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::models::{ItemId, ValidationError, WalletAddress};
use super::error::ApiError;

/// JSON body whose decode failures become validation errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ValidJson<T>(pub T);

/// The single path parameter, percent-decoded.
async fn path_segment<S>(parts: &mut Parts, state: &S) -> Result<String, ApiError>
where
    S: Send + Sync,
{
    let Path(raw): Path<String> = Path::from_request_parts(parts, state)
        .await
        .map_err(|rejection| {
            ApiError::Validation(ValidationError::Path {
                reason: rejection.body_text(),
            })
        })?;
    Ok(raw)
}

/// Extract and validate a wallet address from path
pub struct ValidWallet(pub WalletAddress);

impl<S> FromRequestParts<S> for ValidWallet
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = path_segment(parts, state).await?;
        Ok(Self(WalletAddress::new(&raw)?))
    }
}

/// Extract and validate an item id from path
pub struct ValidItemId(pub ItemId);

impl<S> FromRequestParts<S> for ValidItemId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = path_segment(parts, state).await?;
        Ok(Self(ItemId::new(&raw)?))
    }
}

/// Extract and validate a UUID from path
pub struct ValidUuid(pub Uuid);

impl<S> FromRequestParts<S> for ValidUuid
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = path_segment(parts, state).await?;

        let uuid = Uuid::parse_str(&raw).map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "invalid UUID format",
            })
        })?;

        Ok(Self(uuid))
    }
}
