// UI layer: the main menu loop and the management sub-menus. The loop owns
// the session and hands it to the flows in `account`, `vehicle` and
// `problem`.

use anyhow::Result;

use crate::api::PostalLookup;
use crate::console::Console;
use crate::input::{pause, read_choice};
use crate::model::SessionUser;
use crate::session::Session;
use crate::store::Store;
use crate::{account, problem, vehicle};

/// Collaborators every flow needs: the database, the postal service and the
/// console.
pub struct Context<S, P, C> {
    pub store: S,
    pub postal: P,
    pub console: C,
}

impl<S: Store, P: PostalLookup, C: Console> Context<S, P, C> {
    pub fn new(store: S, postal: P, console: C) -> Self {
        Context {
            store,
            postal,
            console,
        }
    }
}

const MAIN_MENU: &str = "
============== LINK CAR ==============
[1] - Criar conta
[2] - Login
[3] - Visualizar/Gerenciar contas
[4] - Registrar carro
[5] - Visualizar/Gerenciar carros
[6] - Registrar problema no carro
[7] - Sobre
[8] - Sair
=======================================";

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainOption {
    CreateAccount,
    Login,
    ManageAccounts,
    RegisterVehicle,
    ManageVehicles,
    ReportProblem,
    About,
    Exit,
}

impl MainOption {
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(Self::CreateAccount),
            2 => Some(Self::Login),
            3 => Some(Self::ManageAccounts),
            4 => Some(Self::RegisterVehicle),
            5 => Some(Self::ManageVehicles),
            6 => Some(Self::ReportProblem),
            7 => Some(Self::About),
            8 => Some(Self::Exit),
            _ => None,
        }
    }

    /// Options that only make sense for a logged-in user.
    pub fn requires_login(self) -> bool {
        matches!(
            self,
            Self::ManageAccounts | Self::RegisterVehicle | Self::ManageVehicles | Self::ReportProblem
        )
    }
}

/// Main interactive menu. Runs until the user picks "Sair"; the only errors
/// that escape are console failures.
pub fn main_menu<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    session: &mut Session,
) -> Result<()> {
    loop {
        ctx.console.say(MAIN_MENU);
        let choice = read_choice(&mut ctx.console, "Escolha uma opção")?;
        let Some(option) = MainOption::from_choice(choice) else {
            ctx.console.alert("Opção inválida!");
            continue;
        };

        if option.requires_login() && !session.is_logged_in() {
            ctx.console.alert("Você não está logado!");
            pause(&mut ctx.console, "Pressione Enter para retornar...")?;
            continue;
        }

        match option {
            MainOption::CreateAccount => account::create(ctx)?,
            MainOption::Login => account::login(ctx, session)?,
            MainOption::ManageAccounts => manage_accounts(ctx, session)?,
            MainOption::RegisterVehicle => {
                if let Some(owner) = session.current().cloned() {
                    vehicle::register(ctx, &owner)?;
                }
            }
            MainOption::ManageVehicles => {
                if let Some(owner) = session.current().cloned() {
                    manage_vehicles(ctx, &owner)?;
                }
            }
            MainOption::ReportProblem => {
                if let Some(owner) = session.current().cloned() {
                    problem::report(ctx, &owner)?;
                }
            }
            MainOption::About => about(ctx)?,
            MainOption::Exit => {
                ctx.console.say("Saindo...");
                return Ok(());
            }
        }
    }
}

fn invalid_option<C: Console>(console: &mut C) -> Result<()> {
    console.alert("Opção inválida!");
    pause(console, "Pressione Enter para retornar ao menu principal...")
}

fn manage_accounts<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    session: &mut Session,
) -> Result<()> {
    ctx.console.say("======== GERENCIAMENTO DE CONTAS ========");
    ctx.console.say("[1] - Visualizar contas");
    ctx.console.say("[2] - Apagar uma conta");
    ctx.console.say("[3] - Alterar informações de uma conta");
    ctx.console.say("[4] - Voltar ao menu principal");
    ctx.console.say("==========================================");
    match read_choice(&mut ctx.console, "Escolha uma opção")? {
        1 => account::list(ctx),
        2 => account::delete(ctx, session),
        3 => account_info(ctx, session),
        4 => Ok(()),
        _ => invalid_option(&mut ctx.console),
    }
}

/// Editing is only offered for the account that is logged in.
fn account_info<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    session: &mut Session,
) -> Result<()> {
    let name = session.current().map(|u| u.name.clone()).unwrap_or_default();
    ctx.console.say(
        "===================================== ALTERAR INFORMAÇÕES DA CONTA =====================================",
    );
    ctx.console.say(&format!("Você está logado como {}", name));
    ctx.console.say(
        "Por questões de segurança, para alterar as informações de uma conta, você precisa estar logado nela.",
    );
    ctx.console.say("[1] - Mudar de conta (Ir para a tela de login)");
    ctx.console.say("[2] - Alterar informações da conta");
    ctx.console.say("[3] - Voltar ao menu principal");
    ctx.console.say(
        "========================================================================================================",
    );
    match read_choice(&mut ctx.console, "Escolha uma opção")? {
        1 => account::login(ctx, session),
        2 => account::update(ctx, session),
        3 => Ok(()),
        _ => invalid_option(&mut ctx.console),
    }
}

fn manage_vehicles<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    owner: &SessionUser,
) -> Result<()> {
    ctx.console.say("======== GERENCIAMENTO DE VEÍCULOS ========");
    ctx.console.say("[1] - Visualizar veículos");
    ctx.console.say("[2] - Apagar um veículo");
    ctx.console.say("[3] - Alterar informações de um veículo");
    ctx.console.say("[4] - Voltar ao menu principal");
    ctx.console.say("===========================================");
    match read_choice(&mut ctx.console, "Escolha uma opção")? {
        1 => vehicle::list(ctx, owner),
        2 => vehicle::delete(ctx, owner),
        3 => vehicle::update(ctx, owner),
        4 => Ok(()),
        _ => invalid_option(&mut ctx.console),
    }
}

fn about<S: Store, P: PostalLookup, C: Console>(ctx: &mut Context<S, P, C>) -> Result<()> {
    ctx.console.say("================================== SOBRE ==================================");
    ctx.console.say(&format!(
        "{} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
    ctx.console.say(env!("CARGO_PKG_DESCRIPTION"));
    ctx.console.say("===========================================================================");
    pause(&mut ctx.console, "Pressione Enter para voltar ao menu principal...")
}
