// Persistence seam. Handlers only talk to `Store`; `PgStore` is the real
// implementation. Every owner-scoped method takes the owner id and must
// never touch rows belonging to anyone else.

use crate::error::StoreError;
use crate::model::{Account, Address, NewAccount, NewVehicle, SessionUser, Vehicle, VehicleDetails};

pub mod postgres;

pub use postgres::PgStore;

pub trait Store {
    /// Whether any account already uses `email`.
    fn email_exists(&mut self, email: &str) -> Result<bool, StoreError>;

    fn create_account(&mut self, account: &NewAccount) -> Result<(), StoreError>;

    /// Plaintext email/password match.
    fn authenticate(&mut self, email: &str, password: &str)
        -> Result<Option<SessionUser>, StoreError>;

    fn list_accounts(&mut self) -> Result<Vec<Account>, StoreError>;

    /// Remove the account together with its vehicles. Returns `false` (and
    /// changes nothing) when no account has this id. Problem reports are
    /// never removed, so a vehicle that has one makes the call fail.
    fn delete_account(&mut self, account_id: i64) -> Result<bool, StoreError>;

    fn update_name(&mut self, account_id: i64, name: &str) -> Result<(), StoreError>;

    fn update_email(&mut self, account_id: i64, email: &str) -> Result<(), StoreError>;

    fn update_address(&mut self, account_id: i64, address: &Address) -> Result<(), StoreError>;

    fn create_vehicle(&mut self, owner_id: i64, vehicle: &NewVehicle) -> Result<(), StoreError>;

    fn list_vehicles(&mut self, owner_id: i64) -> Result<Vec<Vehicle>, StoreError>;

    fn find_vehicle(&mut self, owner_id: i64, vehicle_id: i64)
        -> Result<Option<Vehicle>, StoreError>;

    /// `false` when the vehicle does not exist or belongs to someone else.
    fn update_vehicle(
        &mut self,
        owner_id: i64,
        vehicle_id: i64,
        details: &VehicleDetails,
    ) -> Result<bool, StoreError>;

    /// `false` when the vehicle does not exist or belongs to someone else.
    fn delete_vehicle(&mut self, owner_id: i64, vehicle_id: i64) -> Result<bool, StoreError>;

    fn create_problem(&mut self, vehicle_id: i64, description: &str) -> Result<(), StoreError>;
}
