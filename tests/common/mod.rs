//! Test doubles shared by the flow tests: an in-memory store, a console fed
//! from a script, and a postal lookup answering from canned JSON bodies.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use anyhow::Result;
use linkcar::api::{PostalCode, PostalLookup, ViaCepResponse};
use linkcar::console::Console;
use linkcar::error::{LookupError, StoreError};
use linkcar::model::{
    Account, Address, NewAccount, NewVehicle, SessionUser, Vehicle, VehicleDetails,
};
use linkcar::store::Store;
use linkcar::ui::Context;

pub type TestContext = Context<MemoryStore, StubLookup, ScriptedConsole>;

pub fn context(store: MemoryStore, answers: &[&str]) -> TestContext {
    Context::new(store, StubLookup::sao_paulo(), ScriptedConsole::new(answers))
}

// ---------------------------------------------------------------- console

pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(answers: &[&str]) -> Self {
        ScriptedConsole {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            prompts: Vec::new(),
            output: Vec::new(),
        }
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("script exhausted at prompt {:?}", prompt))
    }

    fn say(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}

// ----------------------------------------------------------------- lookup

pub struct StubLookup {
    bodies: HashMap<String, String>,
    calls: RefCell<Vec<String>>,
}

impl StubLookup {
    pub fn new() -> Self {
        StubLookup {
            bodies: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Knows 01310100 (Praça da Sé) and nothing else.
    pub fn sao_paulo() -> Self {
        Self::new().with(
            "01310100",
            r#"{"cep":"01310-100","uf":"SP","localidade":"São Paulo","logradouro":"Praça da Sé","bairro":"Sé"}"#,
        )
    }

    pub fn with(mut self, code: &str, body: &str) -> Self {
        self.bodies.insert(code.to_string(), body.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl PostalLookup for StubLookup {
    fn lookup(&self, code: &PostalCode) -> Result<Address, LookupError> {
        self.calls.borrow_mut().push(code.to_string());
        match self.bodies.get(code.as_str()) {
            Some(body) => {
                let response: ViaCepResponse =
                    serde_json::from_str(body).expect("stub body is valid JSON");
                response.into_address(code)
            }
            None => Err(LookupError::Status(reqwest::StatusCode::BAD_REQUEST)),
        }
    }
}

// ------------------------------------------------------------------ store

#[derive(Debug, Clone)]
pub struct StoredAccount {
    pub id: i64,
    pub account: NewAccount,
}

#[derive(Default)]
pub struct MemoryStore {
    pub accounts: Vec<StoredAccount>,
    pub vehicles: Vec<Vehicle>,
    /// (vehicle id, description)
    pub problems: Vec<(i64, String)>,
    next_account_id: i64,
    next_vehicle_id: i64,
    /// Make every write fail like a rejected statement.
    pub fail_writes: bool,
}

fn simulated() -> StoreError {
    StoreError::Database(sqlx::Error::Protocol("simulated failure".into()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account with the given id, email and password.
    pub fn seed_account(&mut self, id: i64, name: &str, email: &str, password: &str) {
        self.accounts.push(StoredAccount {
            id,
            account: NewAccount {
                name: name.into(),
                email: email.into(),
                password: password.into(),
                address: Address {
                    postal_code: "01310100".into(),
                    state: Some("SP".into()),
                    city: Some("São Paulo".into()),
                    street: None,
                    neighborhood: None,
                },
            },
        });
        self.next_account_id = self.next_account_id.max(id);
    }

    pub fn seed_vehicle(&mut self, id: i64, owner_id: i64, brand: &str, model: &str, plate: &str) {
        self.vehicles.push(Vehicle {
            id,
            owner_id,
            chassis: "9BWZZZ377VT004251".into(),
            details: VehicleDetails {
                brand: brand.into(),
                model: model.into(),
                color: "Prata".into(),
                plate: plate.into(),
            },
        });
        self.next_vehicle_id = self.next_vehicle_id.max(id);
    }

    pub fn account(&self, id: i64) -> Option<&NewAccount> {
        self.accounts.iter().find(|a| a.id == id).map(|a| &a.account)
    }

    pub fn vehicle(&self, id: i64) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Problem rows hold a foreign key on their vehicle, like `problemas`.
    fn referenced(&self, vehicle_id: i64) -> Result<(), StoreError> {
        if self.problems.iter().any(|(id, _)| *id == vehicle_id) {
            Err(StoreError::Database(sqlx::Error::Protocol(
                "foreign key violation on problemas".into(),
            )))
        } else {
            Ok(())
        }
    }

    fn write_guard(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            Err(simulated())
        } else {
            Ok(())
        }
    }

    fn account_mut(&mut self, id: i64) -> Option<&mut NewAccount> {
        self.accounts
            .iter_mut()
            .find(|a| a.id == id)
            .map(|a| &mut a.account)
    }
}

impl Store for MemoryStore {
    fn email_exists(&mut self, email: &str) -> Result<bool, StoreError> {
        Ok(self.accounts.iter().any(|a| a.account.email == email))
    }

    fn create_account(&mut self, account: &NewAccount) -> Result<(), StoreError> {
        self.write_guard()?;
        self.next_account_id += 1;
        self.accounts.push(StoredAccount {
            id: self.next_account_id,
            account: account.clone(),
        });
        Ok(())
    }

    fn authenticate(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionUser>, StoreError> {
        Ok(self
            .accounts
            .iter()
            .find(|a| a.account.email == email && a.account.password == password)
            .map(|a| SessionUser {
                id: a.id,
                name: a.account.name.clone(),
                email: a.account.email.clone(),
            }))
    }

    fn list_accounts(&mut self) -> Result<Vec<Account>, StoreError> {
        Ok(self
            .accounts
            .iter()
            .map(|a| Account {
                id: a.id,
                name: a.account.name.clone(),
                email: a.account.email.clone(),
                postal_code: Some(a.account.address.postal_code.clone()),
                state: a.account.address.state.clone(),
                city: a.account.address.city.clone(),
                street: a.account.address.street.clone(),
                neighborhood: a.account.address.neighborhood.clone(),
            })
            .collect())
    }

    fn delete_account(&mut self, account_id: i64) -> Result<bool, StoreError> {
        self.write_guard()?;
        if !self.accounts.iter().any(|a| a.id == account_id) {
            return Ok(false);
        }
        let owned: Vec<i64> = self
            .vehicles
            .iter()
            .filter(|v| v.owner_id == account_id)
            .map(|v| v.id)
            .collect();
        for vehicle_id in owned {
            self.referenced(vehicle_id)?;
        }
        self.vehicles.retain(|v| v.owner_id != account_id);
        self.accounts.retain(|a| a.id != account_id);
        Ok(true)
    }

    fn update_name(&mut self, account_id: i64, name: &str) -> Result<(), StoreError> {
        self.write_guard()?;
        if let Some(account) = self.account_mut(account_id) {
            account.name = name.into();
        }
        Ok(())
    }

    fn update_email(&mut self, account_id: i64, email: &str) -> Result<(), StoreError> {
        self.write_guard()?;
        if let Some(account) = self.account_mut(account_id) {
            account.email = email.into();
        }
        Ok(())
    }

    fn update_address(&mut self, account_id: i64, address: &Address) -> Result<(), StoreError> {
        self.write_guard()?;
        if let Some(account) = self.account_mut(account_id) {
            account.address = address.clone();
        }
        Ok(())
    }

    fn create_vehicle(&mut self, owner_id: i64, vehicle: &NewVehicle) -> Result<(), StoreError> {
        self.write_guard()?;
        self.next_vehicle_id += 1;
        self.vehicles.push(Vehicle {
            id: self.next_vehicle_id,
            owner_id,
            chassis: vehicle.chassis.clone(),
            details: vehicle.details.clone(),
        });
        Ok(())
    }

    fn list_vehicles(&mut self, owner_id: i64) -> Result<Vec<Vehicle>, StoreError> {
        Ok(self
            .vehicles
            .iter()
            .filter(|v| v.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn find_vehicle(
        &mut self,
        owner_id: i64,
        vehicle_id: i64,
    ) -> Result<Option<Vehicle>, StoreError> {
        Ok(self
            .vehicles
            .iter()
            .find(|v| v.id == vehicle_id && v.owner_id == owner_id)
            .cloned())
    }

    fn update_vehicle(
        &mut self,
        owner_id: i64,
        vehicle_id: i64,
        details: &VehicleDetails,
    ) -> Result<bool, StoreError> {
        self.write_guard()?;
        match self
            .vehicles
            .iter_mut()
            .find(|v| v.id == vehicle_id && v.owner_id == owner_id)
        {
            Some(vehicle) => {
                vehicle.details = details.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_vehicle(&mut self, owner_id: i64, vehicle_id: i64) -> Result<bool, StoreError> {
        self.write_guard()?;
        if self.find_vehicle(owner_id, vehicle_id)?.is_none() {
            return Ok(false);
        }
        self.referenced(vehicle_id)?;
        self.vehicles
            .retain(|v| !(v.id == vehicle_id && v.owner_id == owner_id));
        Ok(true)
    }

    fn create_problem(&mut self, vehicle_id: i64, description: &str) -> Result<(), StoreError> {
        self.write_guard()?;
        self.problems.push((vehicle_id, description.to_string()));
        Ok(())
    }
}

pub fn user(id: i64, name: &str, email: &str) -> SessionUser {
    SessionUser {
        id,
        name: name.into(),
        email: email.into(),
    }
}
