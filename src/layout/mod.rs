/// Block layout of a product card in logical units.
pub mod compositor;
