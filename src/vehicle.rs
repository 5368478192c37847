// Vehicle flows. Every call receives the logged-in user and every store call
// is scoped by that user's id, so another owner's vehicles are unreachable.

use anyhow::Result;

use crate::api::PostalLookup;
use crate::console::Console;
use crate::input::{is_valid_chassis, pause, read_choice};
use crate::model::{NewVehicle, SessionUser, VehicleDetails};
use crate::store::Store;
use crate::ui::Context;

const BACK: &str = "Pressione Enter para voltar ao menu...";
const NOT_FOUND: &str = "Veículo não encontrado ou não pertence a este usuário.";

/// Register a car for `owner`. A chassis that is not 17 characters long
/// aborts the flow before anything else is asked.
pub fn register<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    owner: &SessionUser,
) -> Result<()> {
    ctx.console
        .say("======================== REGISTRO DE CARRO ========================");
    ctx.console.say(&format!(
        "Você está logado como {}. O carro registrado estará ligado a este usuário.",
        owner.name
    ));

    let chassis = ctx
        .console
        .read_line("Por favor, informe o número do chassi do carro")?;
    if !is_valid_chassis(&chassis) {
        ctx.console
            .alert("Número do chassi inválido! Verifique a quantidade de caracteres...");
        return pause(&mut ctx.console, "Pressione Enter para retornar ao menu principal...");
    }

    let brand = ctx.console.read_line("Por favor, informe a marca do carro")?;
    let model = ctx.console.read_line("Por favor, informe o modelo do carro")?;
    let color = ctx.console.read_line("Por favor, informe a cor do carro")?;
    let plate = ctx
        .console
        .read_line("Por favor, informe a placa do carro (ABC1D23) ou (ABC-1234)")?;

    let vehicle = NewVehicle {
        chassis,
        details: VehicleDetails {
            brand,
            model,
            color,
            plate,
        },
    };
    match ctx.store.create_vehicle(owner.id, &vehicle) {
        Ok(()) => ctx.console.say(&format!(
            "Veículo {} {} registrado com sucesso para {}!",
            vehicle.details.brand, vehicle.details.model, owner.name
        )),
        Err(e) => {
            tracing::error!(user_id = owner.id, error = %e, "vehicle insert failed");
            ctx.console.alert(&format!("Erro ao registrar veículo: {}", e));
        }
    }

    pause(&mut ctx.console, "Pressione Enter para retornar ao menu principal...")
}

/// Show the owner's vehicles, then wait for Enter.
pub fn list<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    owner: &SessionUser,
) -> Result<()> {
    match ctx.store.list_vehicles(owner.id) {
        Ok(vehicles) if vehicles.is_empty() => {
            ctx.console.say("Você não tem veículos cadastrados.");
        }
        Ok(vehicles) => {
            ctx.console
                .say(&format!("Veículos cadastrados por {}:", owner.name));
            for v in vehicles {
                ctx.console.say("=============================================");
                ctx.console.say(&format!("ID: {}", v.id));
                ctx.console.say(&format!("Marca: {}", v.details.brand));
                ctx.console.say(&format!("Modelo: {}", v.details.model));
                ctx.console.say(&format!("Cor: {}", v.details.color));
                ctx.console.say(&format!("Placa: {}", v.details.plate));
                ctx.console.say(&format!("Chassi: {}", v.chassis));
                ctx.console.say("=============================================");
            }
        }
        Err(e) => {
            tracing::error!(user_id = owner.id, error = %e, "vehicle listing failed");
            ctx.console.alert(&format!("Erro ao visualizar veículos: {}", e));
        }
    }

    pause(&mut ctx.console, BACK)
}

pub fn delete<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    owner: &SessionUser,
) -> Result<()> {
    list(ctx, owner)?;
    let id = read_choice(&mut ctx.console, "Informe o ID do veículo que deseja remover")?;

    match ctx.store.delete_vehicle(owner.id, id) {
        Ok(true) => ctx
            .console
            .say(&format!("Veículo ID {} removido com sucesso!", id)),
        Ok(false) => ctx.console.alert(NOT_FOUND),
        Err(e) => {
            tracing::error!(user_id = owner.id, vehicle_id = id, error = %e, "vehicle delete failed");
            ctx.console.alert(&format!("Erro ao apagar veículo: {}", e));
        }
    }

    pause(&mut ctx.console, BACK)
}

/// Replace brand, model, color and plate. An empty answer keeps the value
/// shown in the prompt.
pub fn update<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    owner: &SessionUser,
) -> Result<()> {
    list(ctx, owner)?;
    let id = read_choice(&mut ctx.console, "Informe o ID do veículo que deseja alterar")?;

    let current = match ctx.store.find_vehicle(owner.id, id) {
        Ok(Some(vehicle)) => vehicle.details,
        Ok(None) => {
            ctx.console.alert(NOT_FOUND);
            return pause(&mut ctx.console, BACK);
        }
        Err(e) => {
            tracing::error!(user_id = owner.id, vehicle_id = id, error = %e, "vehicle lookup failed");
            ctx.console
                .alert(&format!("Erro ao alterar informações do veículo: {}", e));
            return pause(&mut ctx.console, BACK);
        }
    };

    ctx.console.say(&format!(
        "Alterando informações do veículo {} {}:",
        current.brand, current.model
    ));
    let details = VehicleDetails {
        brand: ask_with_default(ctx, "Informe a nova marca", &current.brand)?,
        model: ask_with_default(ctx, "Informe o novo modelo", &current.model)?,
        color: ask_with_default(ctx, "Informe a nova cor", &current.color)?,
        plate: ask_with_default(ctx, "Informe a nova placa", &current.plate)?,
    };

    match ctx.store.update_vehicle(owner.id, id, &details) {
        Ok(true) => ctx.console.say("Informações alteradas com sucesso!"),
        Ok(false) => ctx.console.alert(NOT_FOUND),
        Err(e) => {
            tracing::error!(user_id = owner.id, vehicle_id = id, error = %e, "vehicle update failed");
            ctx.console
                .alert(&format!("Erro ao alterar informações do veículo: {}", e));
        }
    }

    pause(&mut ctx.console, BACK)
}

fn ask_with_default<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    label: &str,
    current: &str,
) -> Result<String> {
    let answer = ctx
        .console
        .read_line(&format!("{} (atual: {})", label, current))?;
    let answer = answer.trim();
    if answer.is_empty() {
        Ok(current.to_string())
    } else {
        Ok(answer.to_string())
    }
}
