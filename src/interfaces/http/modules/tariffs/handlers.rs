//! Tariff table handler

use axum::{extract::State, Json};

use super::dto::{TariffDto, TariffTableDto};
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::modules::sessions::ParkingState;

#[utoipa::path(
    get,
    path = "/api/v1/tariffs",
    tag = "Tariffs",
    responses(
        (
            status = 200,
            description = "Hourly rate and area routing per vehicle class",
            body = ApiResponse<TariffTableDto>
        )
    )
)]
pub async fn list_tariffs(State(state): State<ParkingState>) -> ApiResult<TariffTableDto> {
    let tariffs = state.service.tariffs();
    let routes = state.service.routes();

    let rates = tariffs
        .rates()
        .map(|(class, rate)| {
            let route = routes.route(class);
            TariffDto {
                vehicle_class: class.to_string(),
                hourly_rate: rate,
                display: tariffs.format_amount(rate),
                primary_area: route.primary.to_string(),
                overflow_area: route.overflow.to_string(),
            }
        })
        .collect();

    Ok(Json(ApiResponse::success(TariffTableDto {
        currency_symbol: tariffs.currency_symbol.clone(),
        rates,
    })))
}
