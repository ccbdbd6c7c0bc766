use serde::{Deserialize, Serialize};
use std::fmt;

/// 央行匯率 XML 的根節點
#[derive(Debug, Clone, Deserialize)]
#[serde(rename = "ValCurs")]
pub struct ValCurs {
    #[serde(rename = "@Date", default)]
    pub date: String,
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "Valute", default)]
    pub valutes: Vec<Valute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Valute {
    #[serde(rename = "@ID", default)]
    pub id: String,
    #[serde(rename = "NumCode", default)]
    pub num_code: String,
    #[serde(rename = "CharCode")]
    pub char_code: String,
    #[serde(rename = "Nominal", default)]
    pub nominal: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "VunitRate", default)]
    pub vunit_rate: Option<String>,
}

/// 輸出 JSON 的單筆貨幣
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub num_code: i32,
    pub char_code: String,
    pub value: f64,
}

/// 溫度區間，每個部門從 [15, 30] 開始收斂
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureBounds {
    pub lower: i32,
    pub upper: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiInterface {
    pub index: u32,
    pub name: String,
    pub hardware_addr: HardwareAddr,
}

/// 6 位元組 MAC 位址
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HardwareAddr(pub [u8; 6]);

impl std::str::FromStr for HardwareAddr {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split([':', '-']).collect();
        if parts.len() != 6 {
            return Err(format!("invalid MAC address: {}", s));
        }

        let mut octets = [0u8; 6];
        for (octet, part) in octets.iter_mut().zip(parts) {
            // 每段必須剛好兩個十六進位字元，from_str_radix 會接受 '+'
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(format!("invalid MAC address: {}", s));
            }
            *octet = u8::from_str_radix(part, 16)
                .map_err(|_| format!("invalid MAC address: {}", s))?;
        }
        Ok(HardwareAddr(octets))
    }
}

impl fmt::Display for HardwareAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", a, b, c, d, e, g)
    }
}
