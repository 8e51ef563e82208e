//! Type definitions for catalog components.
//!
//! Components travel as JSON in the shape the catalog files use:
//! `{ id, name, type, price, imageUrl, specs }`. The `specs` object is
//! decoded into a typed struct selected by `type`, so every attribute a
//! category can declare is an explicit `Option` rather than a probe into a
//! loose map.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// One of the eight build slots. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "CPU")]
    Cpu,
    Motherboard,
    #[serde(rename = "RAM")]
    Ram,
    #[serde(rename = "GPU")]
    Gpu,
    Storage,
    #[serde(rename = "PSU")]
    Psu,
    Case,
    Cooler,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Cpu,
        Category::Motherboard,
        Category::Ram,
        Category::Gpu,
        Category::Storage,
        Category::Psu,
        Category::Case,
        Category::Cooler,
    ];

    /// Name used in catalog files and build records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Motherboard => "Motherboard",
            Category::Ram => "RAM",
            Category::Gpu => "GPU",
            Category::Storage => "Storage",
            Category::Psu => "PSU",
            Category::Case => "Case",
            Category::Cooler => "Cooler",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-insensitive, so `cpu` and `CPU` both parse.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(input.trim()))
            .ok_or_else(|| format!("Unknown component category: {}", input))
    }
}

/// Motherboard physical size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormFactor {
    #[serde(rename = "ATX")]
    Atx,
    #[serde(rename = "Micro-ATX")]
    MicroAtx,
    #[serde(rename = "Mini-ITX")]
    MiniItx,
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormFactor::Atx => "ATX",
            FormFactor::MicroAtx => "Micro-ATX",
            FormFactor::MiniItx => "Mini-ITX",
        })
    }
}

/// Memory module generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryStandard {
    #[serde(rename = "DDR4")]
    Ddr4,
    #[serde(rename = "DDR5")]
    Ddr5,
}

impl fmt::Display for MemoryStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemoryStandard::Ddr4 => "DDR4",
            MemoryStandard::Ddr5 => "DDR5",
        })
    }
}

// =============================================================================
// PER-CATEGORY SPECS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<String>,
    /// Watts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_draw: Option<u32>,
    /// Officially supported memory speed, e.g. "5200MHz"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_ram_speed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotherboardSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<FormFactor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chipset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<MemoryStandard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_ram_speeds: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RamSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_type: Option<MemoryStandard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vram: Option<String>,
    /// Card length in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Watts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_draw: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsuSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wattage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_form_factors: Option<Vec<FormFactor>>,
    /// Graphics card clearance in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gpu_length: Option<u32>,
    /// CPU cooler clearance in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cooler_height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoolerSpecs {
    /// Height in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Category-tagged specification sheet.
///
/// `Unclassified` keeps entries whose `type` is not one of the eight
/// categories. They carry no constraints and cannot occupy a build slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Specs {
    Cpu(CpuSpecs),
    Motherboard(MotherboardSpecs),
    Ram(RamSpecs),
    Gpu(GpuSpecs),
    Storage(StorageSpecs),
    Psu(PsuSpecs),
    Case(CaseSpecs),
    Cooler(CoolerSpecs),
    Unclassified {
        kind: String,
        attributes: Map<String, Value>,
    },
}

impl Specs {
    pub fn category(&self) -> Option<Category> {
        match self {
            Specs::Cpu(_) => Some(Category::Cpu),
            Specs::Motherboard(_) => Some(Category::Motherboard),
            Specs::Ram(_) => Some(Category::Ram),
            Specs::Gpu(_) => Some(Category::Gpu),
            Specs::Storage(_) => Some(Category::Storage),
            Specs::Psu(_) => Some(Category::Psu),
            Specs::Case(_) => Some(Category::Case),
            Specs::Cooler(_) => Some(Category::Cooler),
            Specs::Unclassified { .. } => None,
        }
    }

    /// The `type` string written to catalog files.
    pub fn type_name(&self) -> &str {
        match self {
            Specs::Unclassified { kind, .. } => kind,
            other => other.category().map_or("", |c| c.as_str()),
        }
    }

    /// Decode a raw `specs` object for the given `type` string.
    pub fn from_raw(kind: &str, raw: Value) -> Result<Self, serde_json::Error> {
        let raw = if raw.is_null() {
            Value::Object(Map::new())
        } else {
            raw
        };

        let category = match kind.parse::<Category>() {
            Ok(category) => category,
            Err(_) => {
                let attributes = match raw {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                return Ok(Specs::Unclassified {
                    kind: kind.to_string(),
                    attributes,
                });
            }
        };

        Ok(match category {
            Category::Cpu => Specs::Cpu(serde_json::from_value(raw)?),
            Category::Motherboard => Specs::Motherboard(serde_json::from_value(raw)?),
            Category::Ram => Specs::Ram(serde_json::from_value(raw)?),
            Category::Gpu => Specs::Gpu(serde_json::from_value(raw)?),
            Category::Storage => Specs::Storage(serde_json::from_value(raw)?),
            Category::Psu => Specs::Psu(serde_json::from_value(raw)?),
            Category::Case => Specs::Case(serde_json::from_value(raw)?),
            Category::Cooler => Specs::Cooler(serde_json::from_value(raw)?),
        })
    }
}

impl Serialize for Specs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Specs::Cpu(s) => s.serialize(serializer),
            Specs::Motherboard(s) => s.serialize(serializer),
            Specs::Ram(s) => s.serialize(serializer),
            Specs::Gpu(s) => s.serialize(serializer),
            Specs::Storage(s) => s.serialize(serializer),
            Specs::Psu(s) => s.serialize(serializer),
            Specs::Case(s) => s.serialize(serializer),
            Specs::Cooler(s) => s.serialize(serializer),
            Specs::Unclassified { attributes, .. } => attributes.serialize(serializer),
        }
    }
}

// =============================================================================
// COMPONENT
// =============================================================================

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ComponentRecord")]
pub struct Component {
    pub id: String,
    pub name: String,
    /// Minor currency unit
    pub price: u64,
    /// Opaque image reference
    pub image_url: String,
    pub specs: Specs,
}

/// Wire form of a component before its specs are typed.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentRecord {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    price: u64,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    specs: Value,
}

impl TryFrom<ComponentRecord> for Component {
    type Error = serde_json::Error;

    fn try_from(record: ComponentRecord) -> Result<Self, Self::Error> {
        let specs = Specs::from_raw(&record.kind, record.specs)?;
        Ok(Component {
            id: record.id,
            name: record.name,
            price: record.price,
            image_url: record.image_url,
            specs,
        })
    }
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Component", 6)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", self.specs.type_name())?;
        state.serialize_field("price", &self.price)?;
        state.serialize_field("imageUrl", &self.image_url)?;
        state.serialize_field("specs", &self.specs)?;
        state.end()
    }
}

impl Component {
    /// `None` for unclassified entries.
    pub fn category(&self) -> Option<Category> {
        self.specs.category()
    }

    /// Declared power draw for the parts the power budget models.
    pub fn power_draw(&self) -> Option<u32> {
        match &self.specs {
            Specs::Cpu(s) => s.power_draw,
            Specs::Gpu(s) => s.power_draw,
            _ => None,
        }
    }

    /// Look up a spec attribute by its catalog key (e.g. `socket`,
    /// `supportedFormFactors`), coerced to strings.
    pub fn spec_value(&self, attribute: &str) -> Option<SpecValue> {
        let specs = serde_json::to_value(&self.specs).ok()?;
        SpecValue::from_json(specs.get(attribute)?)
    }
}

/// A spec attribute coerced for filtering and faceting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecValue {
    Scalar(String),
    List(Vec<String>),
}

impl SpecValue {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Array(items) => Some(SpecValue::List(
                items.iter().filter_map(scalar_string).collect(),
            )),
            other => scalar_string(other).map(SpecValue::Scalar),
        }
    }

    /// Lists match on membership, scalars on exact equality.
    pub fn matches(&self, wanted: &str) -> bool {
        match self {
            SpecValue::Scalar(s) => s == wanted,
            SpecValue::List(items) => items.iter().any(|s| s == wanted),
        }
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
