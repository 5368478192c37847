// Domain records. Field names are English; the `#[sqlx(rename)]` attributes
// map them onto the existing Portuguese column names.

use sqlx::FromRow;

/// Address data resolved from a postal code. Every field the lookup service
/// may omit is an `Option`, so a missing street is visible to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Eight characters, no separators.
    pub postal_code: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
}

/// Everything needed to insert a row in `usuarios`.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: Address,
}

/// An account as shown in listings (the password is never selected).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Account {
    pub id: i64,
    #[sqlx(rename = "nome")]
    pub name: String,
    pub email: String,
    #[sqlx(rename = "cep")]
    pub postal_code: Option<String>,
    #[sqlx(rename = "uf")]
    pub state: Option<String>,
    #[sqlx(rename = "cidade")]
    pub city: Option<String>,
    #[sqlx(rename = "rua")]
    pub street: Option<String>,
    #[sqlx(rename = "bairro")]
    pub neighborhood: Option<String>,
}

/// Identity kept in the session after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SessionUser {
    pub id: i64,
    #[sqlx(rename = "nome")]
    pub name: String,
    pub email: String,
}

/// The four fields a vehicle owner may edit.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct VehicleDetails {
    #[sqlx(rename = "marca")]
    pub brand: String,
    #[sqlx(rename = "modelo")]
    pub model: String,
    #[sqlx(rename = "cor")]
    pub color: String,
    #[sqlx(rename = "placa")]
    pub plate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Vehicle {
    pub id: i64,
    #[sqlx(rename = "id_usuario")]
    pub owner_id: i64,
    #[sqlx(rename = "chassi")]
    pub chassis: String,
    #[sqlx(flatten)]
    pub details: VehicleDetails,
}

/// Insert payload for `veiculos`; the owner comes from the session.
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub chassis: String,
    pub details: VehicleDetails,
}
