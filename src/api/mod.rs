pub mod workflow_dto;
