// Problem reports: pick one of your cars by its position in the list and
// describe what is wrong with it.

use anyhow::Result;

use crate::api::PostalLookup;
use crate::console::Console;
use crate::input::{pause, read_choice};
use crate::model::SessionUser;
use crate::store::Store;
use crate::ui::Context;

const BACK: &str = "Pressione Enter para voltar ao menu...";

/// Map a 1-based menu position onto an index into a list of `len` items.
pub fn position_to_index(position: i64, len: usize) -> Option<usize> {
    let index = usize::try_from(position).ok()?.checked_sub(1)?;
    (index < len).then_some(index)
}

pub fn report<S: Store, P: PostalLookup, C: Console>(
    ctx: &mut Context<S, P, C>,
    owner: &SessionUser,
) -> Result<()> {
    let vehicles = match ctx.store.list_vehicles(owner.id) {
        Ok(vehicles) => vehicles,
        Err(e) => {
            tracing::error!(user_id = owner.id, error = %e, "vehicle listing failed");
            ctx.console.alert(&format!("Erro ao registrar problema: {}", e));
            return pause(&mut ctx.console, BACK);
        }
    };
    if vehicles.is_empty() {
        ctx.console.say("Você não tem veículos cadastrados.");
        return pause(&mut ctx.console, BACK);
    }

    ctx.console
        .say(&format!("Veículos cadastrados por {}:", owner.name));
    for (i, v) in vehicles.iter().enumerate() {
        ctx.console.say(&format!(
            "[{}] {} {}, placa: {}",
            i + 1,
            v.details.brand,
            v.details.model,
            v.details.plate
        ));
    }

    let position = read_choice(
        &mut ctx.console,
        "Escolha o número do veículo para registrar o problema",
    )?;
    let Some(vehicle) = position_to_index(position, vehicles.len()).and_then(|i| vehicles.get(i)) else {
        ctx.console.alert("Opção inválida!");
        return pause(&mut ctx.console, BACK);
    };

    let description = ctx
        .console
        .read_line("Por favor, informe o problema encontrado no veículo")?;
    match ctx.store.create_problem(vehicle.id, &description) {
        Ok(()) => ctx.console.say(&format!(
            "Problema de '{}' no carro {} {} de {} registrado, e será verificado para um diagnóstico.",
            description, vehicle.details.brand, vehicle.details.model, owner.name
        )),
        Err(e) => {
            tracing::error!(vehicle_id = vehicle.id, error = %e, "problem insert failed");
            ctx.console.alert(&format!("Erro ao registrar problema: {}", e));
        }
    }

    pause(&mut ctx.console, BACK)
}
