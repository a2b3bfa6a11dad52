//! Physical constants and the unit system shared by every field kernel.
//!
//! ## Units
//!
//! All kernels work in one fixed system:
//!
//! - lengths and positions in millimetres (mm),
//! - magnetic polarization ("magnetization", μ₀·M) in millitesla (mT),
//! - currents in amperes (A),
//! - dipole moments in mT·mm³,
//! - flux density results in millitesla (mT).
//!
//! In this system the Biot–Savart prefactor μ₀/4π equals `0.1 mT·mm/A` when
//! μ₀ is taken as the conventional 4π × 10⁻⁷ H/m.

/// Vacuum permeability μ₀ in henries per meter (H/m).
/// Approximate value: 1.25663706212 × 10⁻⁶ H/m (12 significant figures).
/// Note: CODATA 2022 value is 1.25663706127 × 10⁻⁶ H/m with relative uncertainty ~10⁻¹⁰.
pub const VACUUM_PERMEABILITY: f64 = 1.256_637_062_12e-6;

/// μ₀/4π in mT·mm/A, using μ₀ = 4π × 10⁻⁷ H/m.
pub const MU0_OVER_4PI: f64 = 0.1;

/// Factor converting μ₀/4π from T·m/A to mT·mm/A.
pub const TESLA_METRE_TO_MILLITESLA_MILLIMETRE: f64 = 1.0e6;
