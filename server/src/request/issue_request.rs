use crate::controller::Intake;
use application::transfer::{DecideRequestDto, ListRequestsDto, RaiseRequestDto};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RaiseRequestRequest {
    isbn: String,
}

#[derive(Debug)]
pub struct DecideRequestRequest {
    id: Uuid,
}

impl DecideRequestRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

// Clamping happens in SelectLimit/SelectOffset, so out-of-range values are not refused here.
#[derive(Debug, Deserialize)]
pub struct ListRequestsRequest {
    limit: Option<i32>,
    offset: Option<i32>,
}

pub struct RequestTransformer;

impl Intake<RaiseRequestRequest> for RequestTransformer {
    type To = RaiseRequestDto;
    fn emit(&self, input: RaiseRequestRequest) -> Self::To {
        RaiseRequestDto { isbn: input.isbn }
    }
}

impl Intake<DecideRequestRequest> for RequestTransformer {
    type To = DecideRequestDto;
    fn emit(&self, input: DecideRequestRequest) -> Self::To {
        DecideRequestDto { id: input.id }
    }
}

impl Intake<ListRequestsRequest> for RequestTransformer {
    type To = ListRequestsDto;
    fn emit(&self, input: ListRequestsRequest) -> Self::To {
        ListRequestsDto {
            limit: input.limit,
            offset: input.offset,
        }
    }
}
