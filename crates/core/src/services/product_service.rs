use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::timer::{default_timer, Timer};
use super::{with_timeout, DEFAULT_REQUEST_TIMEOUT};
use crate::api::traits::ForecastApi;
use crate::errors::CoreError;
use crate::models::product::{
    NewProduct, ProductCreated, ProductDraft, ProductField, DEFAULT_LEAD_TIME_DAYS,
    DEFAULT_MIN_ORDER_QUANTITY,
};

/// Shown when name, category or base price is missing.
pub const MISSING_FIELDS: &str = "Please fill in all required fields";

/// Shown when the service fails without an error message of its own.
pub const SUBMIT_FAILED: &str = "Failed to add product. Please try again.";

/// How long the confirmation stays up before the form clears.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(3000);

const SKU_SUFFIX_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    /// Product created; the form clears once `reset_at` passes.
    Succeeded { reset_at: Instant },
    Failed(String),
}

/// The "Add New Product" form.
#[derive(Debug)]
pub struct ProductForm {
    draft: ProductDraft,
    status: SubmitStatus,
    last_created: Option<ProductCreated>,
    reset_delay: Duration,
    timeout: Duration,
    timer: Option<Arc<dyn Timer>>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductForm {
    pub fn new() -> Self {
        Self::with_timings(DEFAULT_RESET_DELAY, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timings(reset_delay: Duration, timeout: Duration) -> Self {
        Self {
            draft: ProductDraft::default(),
            status: SubmitStatus::Idle,
            last_created: None,
            reset_delay,
            timeout,
            timer: default_timer(),
        }
    }

    pub fn with_timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = Some(timer);
        self
    }

    // ── Editing ─────────────────────────────────────────────────────

    pub fn set_field(&mut self, field: ProductField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    #[must_use]
    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProductDraft {
        &mut self.draft
    }

    /// Clear the error banner.
    pub fn dismiss_error(&mut self) {
        if matches!(self.status, SubmitStatus::Failed(_)) {
            self.status = SubmitStatus::Idle;
        }
    }

    // ── Submit ──────────────────────────────────────────────────────

    /// Validate, coerce and post the draft.
    ///
    /// Validation failures never reach the network. The outcome is also
    /// reflected in [`ProductForm::status`].
    pub async fn submit(&mut self, api: &dyn ForecastApi) -> Result<ProductCreated, CoreError> {
        let product = match prepare_product(&self.draft, Utc::now()) {
            Ok(p) => p,
            Err(e) => {
                self.status = SubmitStatus::Failed(banner_message(&e));
                return Err(e);
            }
        };

        self.status = SubmitStatus::Submitting;
        tracing::info!(sku_id = %product.sku_id, name = %product.name, "submitting new product");

        let result = with_timeout(
            self.timer.as_deref(),
            "/add-product",
            self.timeout,
            api.add_product(&product),
        )
        .await;
        match result {
            Ok(created) => {
                self.status = SubmitStatus::Succeeded {
                    reset_at: Instant::now() + self.reset_delay,
                };
                self.last_created = Some(created.clone());
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to add product");
                self.status = SubmitStatus::Failed(banner_message(&e));
                Err(e)
            }
        }
    }

    /// Clear the form if the confirmation delay has passed at `now`.
    /// Returns `true` when the form was reset.
    pub fn poll_reset(&mut self, now: Instant) -> bool {
        match self.status {
            SubmitStatus::Succeeded { reset_at } if now >= reset_at => {
                self.draft = ProductDraft::default();
                self.status = SubmitStatus::Idle;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            SubmitStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    #[must_use]
    pub fn last_created(&self) -> Option<&ProductCreated> {
        self.last_created.as_ref()
    }
}

fn banner_message(e: &CoreError) -> String {
    match e {
        CoreError::ValidationError(msg) => msg.clone(),
        other => other
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| SUBMIT_FAILED.to_string()),
    }
}

/// Turn a draft into the record sent to the service.
///
/// Name, category and base price are required. Lead time and minimum order
/// quantity fall back to 3 and 50 when blank, non-numeric or zero. A blank
/// SKU id is generated from `now`.
pub fn prepare_product(draft: &ProductDraft, now: DateTime<Utc>) -> Result<NewProduct, CoreError> {
    if draft.name.is_empty() || draft.category.is_empty() || draft.base_price.is_empty() {
        return Err(CoreError::ValidationError(MISSING_FIELDS.to_string()));
    }

    let base_price = parse_float_prefix(&draft.base_price).ok_or_else(|| {
        CoreError::ValidationError(format!(
            "Base price '{}' is not a number",
            draft.base_price
        ))
    })?;
    if !base_price.is_finite() || base_price < 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Base price must be a non-negative amount, got {base_price}"
        )));
    }

    let sku_id = if draft.sku_id.is_empty() {
        generate_sku_id(now)?
    } else {
        draft.sku_id.clone()
    };

    Ok(NewProduct {
        sku_id,
        name: draft.name.clone(),
        category: draft.category.clone(),
        base_price,
        description: draft.description.clone(),
        supplier: draft.supplier.clone(),
        lead_time_days: positive_or(&draft.lead_time_days, DEFAULT_LEAD_TIME_DAYS),
        min_order_quantity: positive_or(&draft.min_order_quantity, DEFAULT_MIN_ORDER_QUANTITY),
    })
}

fn positive_or(raw: &str, default: u32) -> u32 {
    match parse_int_prefix(raw) {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => default,
    }
}

// ── SKU identifiers ─────────────────────────────────────────────────

/// New SKU id: `SKU` + last six digits of the millisecond timestamp +
/// three random characters from `[0-9A-Z]`.
pub fn generate_sku_id(now: DateTime<Utc>) -> Result<String, CoreError> {
    Ok(format_sku_id(now.timestamp_millis(), random_suffix()?))
}

/// Deterministic part of [`generate_sku_id`]. `suffix` holds alphabet
/// indices; larger values wrap.
pub fn format_sku_id(timestamp_millis: i64, suffix: [u8; 3]) -> String {
    let millis = timestamp_millis.unsigned_abs() % 1_000_000;
    let suffix: String = suffix
        .iter()
        .map(|b| SKU_SUFFIX_ALPHABET[usize::from(*b) % SKU_SUFFIX_ALPHABET.len()] as char)
        .collect();
    format!("SKU{millis:06}{suffix}")
}

/// Largest multiple of the alphabet size (36 * 7) that fits in a byte.
const UNBIASED_BYTE_LIMIT: u8 = 252;

/// Three uniformly distributed alphabet indices.
fn random_suffix() -> Result<[u8; 3], CoreError> {
    let mut suffix = [0u8; 3];
    let mut filled = 0;
    let mut pool = [0u8; 8];
    while filled < suffix.len() {
        getrandom::getrandom(&mut pool)
            .map_err(|e| CoreError::Randomness(format!("Failed to generate SKU suffix: {e}")))?;
        filled = take_unbiased(&pool, &mut suffix, filled);
    }
    Ok(suffix)
}

/// Fill `out[filled..]` with alphabet indices from `pool`, dropping bytes at
/// or above [`UNBIASED_BYTE_LIMIT`]. Returns the new fill count.
fn take_unbiased(pool: &[u8], out: &mut [u8], mut filled: usize) -> usize {
    for &b in pool {
        if filled == out.len() {
            break;
        }
        if b < UNBIASED_BYTE_LIMIT {
            out[filled] = b % SKU_SUFFIX_ALPHABET.len() as u8;
            filled += 1;
        }
    }
    filled
}

// ── Lenient number parsing ──────────────────────────────────────────

/// Parse the longest numeric prefix as a float: `" 12.5kg"` → 12.5.
/// Leading whitespace is skipped; `None` if no digits lead the string.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Parse the longest integer prefix: `"7 days"` → 7, `"3.9"` → 3.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}
