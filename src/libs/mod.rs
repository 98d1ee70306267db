pub mod io;
pub mod phylo;
pub mod viz;
