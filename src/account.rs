// Account flows: sign-up, login, listing, deletion and editing the logged-in
// account. Database errors are reported and the flow returns to the menu.

use anyhow::Result;

use crate::api::{PostalCode, PostalLookup};
use crate::console::Console;
use crate::input::{or_blank, pause, read_choice};
use crate::model::{Address, NewAccount};
use crate::session::Session;
use crate::store::Store;
use crate::ui::Context;

const BACK_TO_MENU: &str = "Pressione Enter para voltar ao menu principal...";
const DUPLICATE_EMAIL: &str = "Já existe um usuário com este email cadastrado!";

/// Ask for a postal code and resolve it. `None` means the flow should stop;
/// the reason has already been printed.
fn fetch_address<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
) -> Result<Option<Address>> {
    let raw = ctx.console.read_line("CEP (ex. 01.310-100)")?;
    let Some(code) = PostalCode::parse(&raw) else {
        ctx.console.alert("CEP inválido!");
        return Ok(None);
    };

    let postal = &ctx.postal;
    match ctx.console.busy("Consultando CEP...", || postal.lookup(&code)) {
        Ok(address) => Ok(Some(address)),
        Err(e) => {
            tracing::warn!(%code, error = %e, "postal lookup failed");
            ctx.console.alert("Erro ao obter dados do CEP.");
            Ok(None)
        }
    }
}

/// Create a new account. The email must not be taken; the address comes
/// from the postal lookup.
pub fn create<S: Store, P: PostalLookup, C: Console>(ctx: &mut Context<S, P, C>) -> Result<()> {
    let email = ctx.console.read_line("Digite o email")?;
    match ctx.store.email_exists(&email) {
        Ok(false) => {}
        Ok(true) => {
            ctx.console.alert(DUPLICATE_EMAIL);
            return Ok(());
        }
        Err(e) => {
            tracing::error!(error = %e, "email lookup failed");
            ctx.console
                .alert(&format!("Erro ao consultar o banco de dados: {}", e));
            return Ok(());
        }
    }

    let password = ctx.console.read_secret("Digite a senha")?;
    let name = ctx.console.read_line("Digite o seu nome completo")?;

    if let Some(address) = fetch_address(ctx)? {
        let account = NewAccount {
            name,
            email,
            password,
            address,
        };
        match ctx.store.create_account(&account) {
            Ok(()) => ctx.console.say("Conta criada com sucesso!"),
            Err(e) => {
                tracing::error!(error = %e, "account insert failed");
                ctx.console
                    .alert(&format!("Erro ao inserir dados no banco de dados: {}", e));
            }
        }
    }

    pause(&mut ctx.console, BACK_TO_MENU)
}

/// Log in, or, when someone is already logged in, offer to switch account
/// or log out.
pub fn login<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    session: &mut Session,
) -> Result<()> {
    if let Some(user) = session.current() {
        let name = user.name.clone();
        ctx.console.say("======================= LOGIN =======================");
        ctx.console.say(&format!("Você está logado como {}", name));
        ctx.console.say("[1] - Entrar em outra conta");
        ctx.console.say("[2] - Sair da conta atual");
        ctx.console.say("[3] - Voltar ao menu principal");
        ctx.console.say("=====================================================");
        match read_choice(&mut ctx.console, "Escolha uma opção")? {
            1 => {
                session.logout();
                return prompt_login(ctx, session);
            }
            2 => {
                session.logout();
                ctx.console.say("Você saiu da conta.");
            }
            _ => {}
        }
        return Ok(());
    }
    prompt_login(ctx, session)
}

fn prompt_login<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    session: &mut Session,
) -> Result<()> {
    let email = ctx.console.read_line("Digite o email")?;
    let password = ctx.console.read_secret("Digite a senha")?;

    match ctx.store.authenticate(&email, &password) {
        Ok(Some(user)) => {
            ctx.console.say(&format!(
                "Login realizado com sucesso! Bem-vindo, {}.",
                user.name
            ));
            session.login(user);
        }
        Ok(None) => ctx.console.alert("Email ou senha incorretos!"),
        Err(e) => {
            tracing::error!(error = %e, "login query failed");
            ctx.console.alert(&format!("Erro ao realizar login: {}", e));
        }
    }

    pause(&mut ctx.console, BACK_TO_MENU)
}

/// Print every account followed by the vehicles it owns.
fn print_accounts<S: Store, P: PostalLookup, C: Console>(ctx: &mut Context<S, P, C>) {
    let accounts = match ctx.store.list_accounts() {
        Ok(accounts) => accounts,
        Err(e) => {
            tracing::error!(error = %e, "account listing failed");
            ctx.console.alert(&format!("Erro ao listar contas: {}", e));
            return;
        }
    };

    for account in accounts {
        ctx.console.say("======================================================");
        ctx.console.say(&format!("ID: {}", account.id));
        ctx.console.say(&format!("Nome: {}", account.name));
        ctx.console.say(&format!("Email: {}", account.email));
        ctx.console.say(&format!("CEP: {}", or_blank(&account.postal_code)));
        ctx.console.say(&format!("UF: {}", or_blank(&account.state)));
        ctx.console.say(&format!("Cidade: {}", or_blank(&account.city)));
        ctx.console.say(&format!("Rua: {}", or_blank(&account.street)));
        ctx.console.say(&format!("Bairro: {}", or_blank(&account.neighborhood)));

        match ctx.store.list_vehicles(account.id) {
            Ok(vehicles) if !vehicles.is_empty() => {
                ctx.console.say("Veículos registrados:");
                for v in vehicles {
                    ctx.console.say(&format!(
                        "- {} {}, placa: {}",
                        v.details.brand, v.details.model, v.details.plate
                    ));
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(account_id = account.id, error = %e, "vehicle listing failed");
                ctx.console.alert(&format!("Erro ao listar contas: {}", e));
                return;
            }
        }
        ctx.console.say("======================================================");
    }
}

pub fn list<S: Store, P: PostalLookup, C: Console>(ctx: &mut Context<S, P, C>) -> Result<()> {
    print_accounts(ctx);
    pause(&mut ctx.console, BACK_TO_MENU)
}

/// Delete an account (and its vehicles) by id. Deleting the account that is
/// logged in also ends the session.
pub fn delete<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    session: &mut Session,
) -> Result<()> {
    print_accounts(ctx);
    let id = read_choice(&mut ctx.console, "Digite o ID da conta a ser deletada")?;

    match ctx.store.delete_account(id) {
        Ok(true) => {
            ctx.console
                .say(&format!("Conta ID {} removida com sucesso!", id));
            if session.current().map(|u| u.id) == Some(id) {
                session.logout();
                ctx.console.say("Você saiu da conta.");
            }
        }
        Ok(false) => ctx.console.alert(&format!("Conta ID {} não encontrada!", id)),
        Err(e) => {
            tracing::error!(account_id = id, error = %e, "account delete failed");
            ctx.console.alert(&format!("Erro ao apagar conta: {}", e));
        }
    }

    pause(&mut ctx.console, BACK_TO_MENU)
}

/// Edit name, address or email of the logged-in account. Only the account in
/// the session can be edited.
pub fn update<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    session: &mut Session,
) -> Result<()> {
    let Some(user) = session.current().cloned() else {
        ctx.console.alert("Você não está logado!");
        return pause(&mut ctx.console, "Pressione Enter para retornar...");
    };

    ctx.console.say("[1] - Nome");
    ctx.console.say("[2] - Endereço");
    ctx.console.say("[3] - Email");
    ctx.console.say("[4] - Sair");
    match read_choice(&mut ctx.console, "Escolha qual informação será alterada")? {
        1 => {
            let name = ctx.console.read_line("Digite o novo nome")?;
            match ctx.store.update_name(user.id, &name) {
                Ok(()) => {
                    session.rename(&name);
                    ctx.console
                        .say(&format!("Nome alterado com sucesso para {}", name));
                }
                Err(e) => {
                    tracing::error!(user_id = user.id, error = %e, "name update failed");
                    ctx.console.alert(&format!("Erro ao alterar nome: {}", e));
                }
            }
        }
        2 => {
            if let Some(address) = fetch_address(ctx)? {
                match ctx.store.update_address(user.id, &address) {
                    Ok(()) => ctx.console.say("Endereço atualizado com sucesso!"),
                    Err(e) => {
                        tracing::error!(user_id = user.id, error = %e, "address update failed");
                        ctx.console
                            .alert(&format!("Erro ao atualizar endereço: {}", e));
                    }
                }
            }
        }
        3 => {
            let email = ctx.console.read_line("Digite o novo email")?;
            if email != user.email {
                match ctx.store.email_exists(&email) {
                    Ok(false) => {}
                    Ok(true) => {
                        ctx.console.alert(DUPLICATE_EMAIL);
                        return pause(&mut ctx.console, "Pressione Enter para retornar...");
                    }
                    Err(e) => {
                        ctx.console.alert(&format!("Erro ao alterar email: {}", e));
                        return pause(&mut ctx.console, "Pressione Enter para retornar...");
                    }
                }
            }
            match ctx.store.update_email(user.id, &email) {
                Ok(()) => {
                    session.change_email(&email);
                    ctx.console
                        .say(&format!("Email alterado com sucesso para {}", email));
                }
                Err(e) => {
                    tracing::error!(user_id = user.id, error = %e, "email update failed");
                    ctx.console.alert(&format!("Erro ao alterar email: {}", e));
                }
            }
        }
        _ => {}
    }

    pause(&mut ctx.console, "Pressione Enter para retornar...")
}
