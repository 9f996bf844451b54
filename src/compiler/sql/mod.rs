pub mod firebird;
pub mod generic;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlserver;
