//! Registry 実装
//!
//! ドメイン層が定義する `ConnectionRegistry` trait の具体的な実装を提供します。
//! コーディネーターは trait に対してジェネリックで、このモジュールには直接依存しません。

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
