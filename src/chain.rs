use core::fmt;

/// Network label derived from a chain identifier. See [`classify`].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Network {
    Mainnet,
    Ropsten,
    Rinkeby,
    Goerli,
    Kovan,
    /// large synthetic identifiers used by local development chains
    Local,
    Unknown,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Ropsten => write!(f, "ropsten"),
            Network::Rinkeby => write!(f, "rinkeby"),
            Network::Goerli => write!(f, "goerli"),
            Network::Kovan => write!(f, "kovan"),
            Network::Local => write!(f, "local"),
            Network::Unknown => write!(f, "unknown"),
        }
    }
}

/// classify the decimal chain identifier as returned by `net_version`
///
/// Any identifier longer than 9 characters that reads as a nonzero number is
/// assumed to be a local development chain.
///
/// ```
/// use metamask_connector::chain::{Network, classify};
///
/// assert_eq!(classify("4"), Network::Rinkeby);
/// assert_eq!(classify("1337133713"), Network::Local);
/// assert_eq!(classify("137"), Network::Unknown);
/// ```
pub fn classify(chain_id: &str) -> Network {
    // a browser counts the length in UTF-16 code units
    if chain_id.encode_utf16().count() > 9 && is_nonzero_number(chain_id) {
        return Network::Local;
    }

    match chain_id {
        "1" => Network::Mainnet,
        "3" => Network::Ropsten,
        "4" => Network::Rinkeby,
        "5" => Network::Goerli,
        "42" => Network::Kovan,
        _ => Network::Unknown,
    }
}

/// Follows how a browser converts a string to a number: blanks around the
/// value are ignored and the `0x`, `0o` and `0b` prefixes are understood.
fn is_nonzero_number(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        let digits = value
            .strip_prefix(prefix)
            .or_else(|| value.strip_prefix(&prefix.to_uppercase()));
        if let Some(digits) = digits {
            return !digits.is_empty()
                && digits.chars().all(|c| c.is_digit(radix))
                && digits.chars().any(|c| c != '0');
        }
    }

    let unsigned = value.trim_start_matches(['+', '-']);
    if unsigned.len() + 1 < value.len() {
        // more than one sign
        return false;
    }
    if unsigned == "Infinity" {
        return true;
    }
    // rust also reads `inf` and `nan`, a browser does not
    if unsigned.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return false;
    }

    value
        .parse::<f64>()
        .map(|number| number != 0.0)
        .unwrap_or(false)
}

/// The chain the provider is connected to.
///
/// The name is always the label [`classify`] gives to the identifier:
/// deserializing ignores any `name` and derives it again from `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "ChainId")]
pub struct ChainInfo {
    id: String,
    name: String,
}

#[derive(serde::Deserialize)]
struct ChainId {
    id: String,
}

impl From<ChainId> for ChainInfo {
    fn from(ChainId { id }: ChainId) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid hexadecimal chain id `{0}'")]
pub struct InvalidChainId(pub String);

impl ChainInfo {
    /// build the chain info of the decimal chain identifier
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let name = classify(&id).to_string();
        Self { id, name }
    }

    /// build the chain info from the hexadecimal chain identifier carried by
    /// the `chainChanged` events (e.g. `"0x1"`)
    ///
    /// Identifiers of any width are accepted.
    pub fn from_hex(chain_id: &str) -> Result<Self, InvalidChainId> {
        let digits = chain_id.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);

        hex_to_decimal(digits)
            .map(Self::new)
            .ok_or_else(|| InvalidChainId(chain_id.to_owned()))
    }

    /// decimal chain identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// label of the [`Network`] for the identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn network(&self) -> Network {
        classify(&self.id)
    }
}

const LIMB: u64 = 1_000_000_000;

/// Converts hexadecimal digits to decimal without width limit, the number is
/// held as little endian base 10^9 limbs.
fn hex_to_decimal(digits: &str) -> Option<String> {
    if digits.is_empty() {
        return None;
    }

    let mut limbs: Vec<u64> = Vec::new();
    for c in digits.chars() {
        let mut carry = u64::from(c.to_digit(16)?);
        for limb in limbs.iter_mut() {
            let value = *limb * 16 + carry;
            *limb = value % LIMB;
            carry = value / LIMB;
        }
        if carry > 0 {
            limbs.push(carry);
        }
    }

    let Some((most_significant, rest)) = limbs.split_last() else {
        return Some("0".to_owned());
    };
    let mut decimal = most_significant.to_string();
    for limb in rest.iter().rev() {
        decimal.push_str(&format!("{limb:09}"));
    }
    Some(decimal)
}
