//! 협력자 저장소 구현.
//!
//! 게이트웨이는 자격증명, refresh digest, 원장 저장소를 소유하지 않습니다.
//! 이 모듈은 서버를 단독으로 실행하고 테스트하기 위한 인메모리 구현을 제공합니다.

pub mod memory;

pub use memory::{MemoryCredentialStore, MemoryDigestStore, MemoryLedger};
