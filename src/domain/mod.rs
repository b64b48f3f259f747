//! Domain model of the checkout flow: cart line items, pricing, orders,
//! enrollment outcomes, and the ports behind which the external collaborators
//! (cart store, device authenticator, payment sheet, backend API) live.

pub mod cart;
pub mod enrollment;
pub mod order;
pub mod ports;
pub mod pricing;
pub mod user;
