// Postgres-backed store. One connection is opened at startup and kept until
// `close`; a current-thread runtime drives the async driver so callers stay
// fully blocking.

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};
use tokio::runtime::{Builder, Runtime};

use super::Store;
use crate::error::StoreError;
use crate::model::{Account, Address, NewAccount, NewVehicle, SessionUser, Vehicle, VehicleDetails};

pub struct PgStore {
    runtime: Runtime,
    conn: PgConnection,
}

impl PgStore {
    pub fn connect(options: &PgConnectOptions) -> Result<Self, StoreError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let conn = runtime.block_on(options.connect())?;
        tracing::info!("database connection established");
        Ok(PgStore { runtime, conn })
    }

    /// Release the connection. Dropping the store also closes it, but this
    /// way the server sees a clean terminate message.
    pub fn close(self) -> Result<(), StoreError> {
        let PgStore { runtime, conn } = self;
        runtime.block_on(conn.close())?;
        tracing::info!("database connection closed");
        Ok(())
    }
}

impl Store for PgStore {
    fn email_exists(&mut self, email: &str) -> Result<bool, StoreError> {
        let row: Option<(i64,)> = self.runtime.block_on(
            sqlx::query_as("SELECT id FROM usuarios WHERE email = $1")
                .bind(email)
                .fetch_optional(&mut self.conn),
        )?;
        Ok(row.is_some())
    }

    fn create_account(&mut self, account: &NewAccount) -> Result<(), StoreError> {
        let address = &account.address;
        self.runtime.block_on(
            sqlx::query(
                r#"
                INSERT INTO usuarios (nome, email, senha, cep, uf, cidade, rua, bairro)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(&account.name)
            .bind(&account.email)
            .bind(&account.password)
            .bind(&address.postal_code)
            .bind(&address.state)
            .bind(&address.city)
            .bind(&address.street)
            .bind(&address.neighborhood)
            .execute(&mut self.conn),
        )?;
        Ok(())
    }

    fn authenticate(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionUser>, StoreError> {
        let user = self.runtime.block_on(
            sqlx::query_as::<_, SessionUser>(
                "SELECT id, nome, email FROM usuarios WHERE email = $1 AND senha = $2",
            )
            .bind(email)
            .bind(password)
            .fetch_optional(&mut self.conn),
        )?;
        Ok(user)
    }

    fn list_accounts(&mut self) -> Result<Vec<Account>, StoreError> {
        let accounts = self.runtime.block_on(
            sqlx::query_as::<_, Account>(
                r#"
                SELECT id, nome, email, cep, uf, cidade, rua, bairro
                FROM usuarios
                ORDER BY id
                "#,
            )
            .fetch_all(&mut self.conn),
        )?;
        Ok(accounts)
    }

    fn delete_account(&mut self, account_id: i64) -> Result<bool, StoreError> {
        let conn = &mut self.conn;
        self.runtime.block_on(async move {
            let mut tx = conn.begin().await?;

            // Problem reports are never deleted here; a vehicle that still has
            // one makes this statement fail and the whole delete roll back.
            sqlx::query("DELETE FROM veiculos WHERE id_usuario = $1")
                .bind(account_id)
                .execute(&mut *tx)
                .await?;

            let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
                .bind(account_id)
                .execute(&mut *tx)
                .await?;

            // Dropping `tx` without commit rolls everything back.
            if result.rows_affected() == 0 {
                return Ok(false);
            }
            tx.commit().await?;
            Ok::<_, sqlx::Error>(true)
        })
        .map_err(StoreError::from)
    }

    fn update_name(&mut self, account_id: i64, name: &str) -> Result<(), StoreError> {
        self.runtime.block_on(
            sqlx::query("UPDATE usuarios SET nome = $1 WHERE id = $2")
                .bind(name)
                .bind(account_id)
                .execute(&mut self.conn),
        )?;
        Ok(())
    }

    fn update_email(&mut self, account_id: i64, email: &str) -> Result<(), StoreError> {
        self.runtime.block_on(
            sqlx::query("UPDATE usuarios SET email = $1 WHERE id = $2")
                .bind(email)
                .bind(account_id)
                .execute(&mut self.conn),
        )?;
        Ok(())
    }

    fn update_address(&mut self, account_id: i64, address: &Address) -> Result<(), StoreError> {
        self.runtime.block_on(
            sqlx::query(
                r#"
                UPDATE usuarios
                SET cep = $1, uf = $2, cidade = $3, rua = $4, bairro = $5
                WHERE id = $6
                "#,
            )
            .bind(&address.postal_code)
            .bind(&address.state)
            .bind(&address.city)
            .bind(&address.street)
            .bind(&address.neighborhood)
            .bind(account_id)
            .execute(&mut self.conn),
        )?;
        Ok(())
    }

    fn create_vehicle(&mut self, owner_id: i64, vehicle: &NewVehicle) -> Result<(), StoreError> {
        let details = &vehicle.details;
        self.runtime.block_on(
            sqlx::query(
                r#"
                INSERT INTO veiculos (id_usuario, chassi, marca, modelo, cor, placa)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(owner_id)
            .bind(&vehicle.chassis)
            .bind(&details.brand)
            .bind(&details.model)
            .bind(&details.color)
            .bind(&details.plate)
            .execute(&mut self.conn),
        )?;
        Ok(())
    }

    fn list_vehicles(&mut self, owner_id: i64) -> Result<Vec<Vehicle>, StoreError> {
        let vehicles = self.runtime.block_on(
            sqlx::query_as::<_, Vehicle>(
                r#"
                SELECT id, id_usuario, chassi, marca, modelo, cor, placa
                FROM veiculos
                WHERE id_usuario = $1
                ORDER BY id
                "#,
            )
            .bind(owner_id)
            .fetch_all(&mut self.conn),
        )?;
        Ok(vehicles)
    }

    fn find_vehicle(
        &mut self,
        owner_id: i64,
        vehicle_id: i64,
    ) -> Result<Option<Vehicle>, StoreError> {
        let vehicle = self.runtime.block_on(
            sqlx::query_as::<_, Vehicle>(
                r#"
                SELECT id, id_usuario, chassi, marca, modelo, cor, placa
                FROM veiculos
                WHERE id = $1 AND id_usuario = $2
                "#,
            )
            .bind(vehicle_id)
            .bind(owner_id)
            .fetch_optional(&mut self.conn),
        )?;
        Ok(vehicle)
    }

    fn update_vehicle(
        &mut self,
        owner_id: i64,
        vehicle_id: i64,
        details: &VehicleDetails,
    ) -> Result<bool, StoreError> {
        let result = self.runtime.block_on(
            sqlx::query(
                r#"
                UPDATE veiculos
                SET marca = $1, modelo = $2, cor = $3, placa = $4
                WHERE id = $5 AND id_usuario = $6
                "#,
            )
            .bind(&details.brand)
            .bind(&details.model)
            .bind(&details.color)
            .bind(&details.plate)
            .bind(vehicle_id)
            .bind(owner_id)
            .execute(&mut self.conn),
        )?;
        Ok(result.rows_affected() > 0)
    }

    fn delete_vehicle(&mut self, owner_id: i64, vehicle_id: i64) -> Result<bool, StoreError> {
        let result = self.runtime.block_on(
            sqlx::query("DELETE FROM veiculos WHERE id = $1 AND id_usuario = $2")
                .bind(vehicle_id)
                .bind(owner_id)
                .execute(&mut self.conn),
        )?;
        Ok(result.rows_affected() > 0)
    }

    fn create_problem(&mut self, vehicle_id: i64, description: &str) -> Result<(), StoreError> {
        self.runtime.block_on(
            sqlx::query("INSERT INTO problemas (id_veiculo, descricao) VALUES ($1, $2)")
                .bind(vehicle_id)
                .bind(description)
                .execute(&mut self.conn),
        )?;
        Ok(())
    }
}
