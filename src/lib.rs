// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive LinkCar
// console.
//
// Module responsibilities:
// - `api`: postal-code normalization and the ViaCEP lookup client.
// - `store`: persistence trait and the Postgres implementation.
// - `ui`: main menu loop and sub-menus; `account`, `vehicle` and `problem`
//   hold the flows they dispatch to.
// - `console`, `input`: terminal access and input helpers.
// - `config`, `error`, `model`, `session`: supporting types.
pub mod account;
pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod input;
pub mod model;
pub mod problem;
pub mod session;
pub mod store;
pub mod ui;
pub mod vehicle;
