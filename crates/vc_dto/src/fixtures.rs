//! Classes shared by the unit tests.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::Mutex;

use crate::cast::{Caster, CasterSpec, SerializableCaster};
use crate::error::{DtoError, TypeError};
use crate::impl_dto;
use crate::info::{
    ClassInfo, ClassInfoCell, Declared, DeclaredType, FieldInfo, OpaqueInfo, OpaqueInfoCell,
    ParamInfo, TypeKind, Visibility,
};
use crate::object::{DtoClass, Opaque, OpaqueClass, OpaqueRef, ToMapping, ToSerializable};
use crate::register_caster;
use crate::tags::{Skip, SkipIfNull, Tag};
use crate::value::{FromValue, Mapping, ToValue, Value, ValueKind};

macro_rules! class_info {
    ($builder:expr) => {{
        static CELL: ClassInfoCell = ClassInfoCell::new();
        CELL.get_or_init(|| $builder)
    }};
}

// -----------------------------------------------------------------------------
// Promoted style

#[derive(Debug)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: Option<String>,
}

impl User {
    pub fn new(id: i64, name: &str, role: Option<&str>) -> Self {
        Self {
            id,
            name: name.into(),
            role: role.map(String::from),
        }
    }
}

impl DtoClass for User {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted(ParamInfo::new::<i64>("id"))
                .promoted(ParamInfo::new::<String>("name"))
                .promoted(
                    ParamInfo::new::<Option<String>>("role")
                        .with_default(Value::Null)
                        .with_tag(SkipIfNull)
                )
                .constructor(|args| {
                    Ok(User {
                        id: args.take()?,
                        name: args.take()?,
                        role: args.take()?,
                    })
                })
                .build()
        )
    }
}

impl_dto!(User { id, name, role });

#[derive(Debug, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
}

impl Address {
    pub fn new(street: &str, city: &str) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
        }
    }
}

impl DtoClass for Address {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted(ParamInfo::new::<String>("street"))
                .promoted(ParamInfo::new::<String>("city"))
                .constructor(|args| {
                    Ok(Address {
                        street: args.take()?,
                        city: args.take()?,
                    })
                })
                .build()
        )
    }
}

impl_dto!(Address { street, city });

#[derive(Debug)]
pub struct Person {
    pub name: String,
    pub address: Arc<Address>,
}

impl Person {
    pub fn new(name: &str, address: Arc<Address>) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

impl DtoClass for Person {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted(ParamInfo::new::<String>("name"))
                .promoted(ParamInfo::new::<Arc<Address>>("address"))
                .constructor(|args| {
                    Ok(Person {
                        name: args.take()?,
                        address: args.take()?,
                    })
                })
                .build()
        )
    }
}

impl_dto!(Person { name, address });

#[derive(Debug)]
pub struct Team {
    pub name: String,
    pub sites: Vec<Arc<Address>>,
}

impl Team {
    pub fn new(name: &str, sites: Vec<Arc<Address>>) -> Self {
        Self {
            name: name.into(),
            sites,
        }
    }
}

impl DtoClass for Team {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted(ParamInfo::new::<String>("name"))
                .promoted(ParamInfo::new::<Vec<Arc<Address>>>("sites"))
                .from_mapping()
                .constructor(|args| {
                    Ok(Team {
                        name: args.take()?,
                        sites: args.take()?,
                    })
                })
                .build()
        )
    }
}

impl_dto!(Team { name, sites });

/// A label that builds itself from `{"label": ..}` or a plain string.
#[derive(Debug)]
pub struct Badge {
    pub text: String,
}

impl DtoClass for Badge {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted(ParamInfo::new::<String>("text"))
                .from_mapping_with(|map| {
                    let text = map.get("label").and_then(Value::as_str).unwrap_or_default();
                    Ok(Badge { text: text.into() })
                })
                .constructor(|args| Ok(Badge { text: args.take()? }))
                .build()
        )
    }
}

impl_dto!(Badge { text });

#[derive(Debug)]
pub struct Org {
    pub team: Arc<Team>,
    pub badge: Option<Arc<Badge>>,
}

impl DtoClass for Org {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted(ParamInfo::new::<Arc<Team>>("team"))
                .promoted(ParamInfo::new::<Option<Arc<Badge>>>("badge").with_default(Value::Null))
                .constructor(|args| {
                    Ok(Org {
                        team: args.take()?,
                        badge: args.take()?,
                    })
                })
                .build()
        )
    }
}

impl_dto!(Org { team, badge });

/// A linked node, the link may be set after construction.
#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub next: Mutex<Option<Arc<Node>>>,
}

impl Node {
    pub fn new(name: &str, next: Option<Arc<Node>>) -> Self {
        Self {
            name: name.into(),
            next: Mutex::new(next),
        }
    }
}

impl DtoClass for Node {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted(ParamInfo::new::<String>("name"))
                .promoted(ParamInfo::new::<Option<Arc<Node>>>("next").with_default(Value::Null))
                .constructor(|args| {
                    Ok(Node {
                        name: args.take()?,
                        next: Mutex::new(args.take()?),
                    })
                })
                .build()
        )
    }
}

impl_dto!(Node { name, next });

#[derive(Debug)]
pub struct Measure {
    pub value: Value,
}

impl Measure {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl DtoClass for Measure {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted(ParamInfo::new::<Value>("value"))
                .constructor(|args| Ok(Measure { value: args.take_value() }))
                .build()
        )
    }
}

impl_dto!(Measure { value });

// -----------------------------------------------------------------------------
// Tags

#[derive(Debug)]
pub struct Secret {
    pub shown: String,
    pub hidden: String,
}

impl Secret {
    pub fn new(shown: &str, hidden: &str) -> Self {
        Self {
            shown: shown.into(),
            hidden: hidden.into(),
        }
    }
}

impl DtoClass for Secret {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted(ParamInfo::new::<String>("shown"))
                .promoted(ParamInfo::new::<String>("hidden").with_tag(Skip))
                .constructor(|args| {
                    Ok(Secret {
                        shown: args.take()?,
                        hidden: args.take()?,
                    })
                })
                .build()
        )
    }
}

impl_dto!(Secret { shown, hidden });

/// Rewrites `"start"` to `"mid"`.
#[derive(Default)]
pub struct CastX;

impl Caster for CastX {
    fn supports(&self, value: &Value) -> bool {
        value.as_str() == Some("start")
    }

    fn cast(&self, _: Value) -> Result<Value, DtoError> {
        Ok(Value::from("mid"))
    }
}

impl Tag for CastX {
    fn into_caster(self: Arc<Self>) -> Option<Arc<dyn Caster>> {
        Some(self)
    }
}

/// Rewrites `"mid"` to `"final"`.
#[derive(Default)]
pub struct CastY;

impl Caster for CastY {
    fn supports(&self, value: &Value) -> bool {
        value.as_str() == Some("mid")
    }

    fn cast(&self, _: Value) -> Result<Value, DtoError> {
        Ok(Value::from("final"))
    }
}

impl Tag for CastY {
    fn into_caster(self: Arc<Self>) -> Option<Arc<dyn Caster>> {
        Some(self)
    }
}

register_caster!(CastY);

/// Two properties with the same casters in opposite order, and a class-level
/// caster list.
#[derive(Debug)]
pub struct Tagged {
    pub xy: String,
    pub yx: String,
}

impl Tagged {
    pub fn new(xy: &str, yx: &str) -> Self {
        Self {
            xy: xy.into(),
            yx: yx.into(),
        }
    }
}

impl DtoClass for Tagged {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted(ParamInfo::new::<String>("xy").with_tag(CastX).with_tag(CastY))
                .promoted(ParamInfo::new::<String>("yx").with_tag(CastY).with_tag(CastX))
                .casters([CasterSpec::of::<SerializableCaster>()])
                .constructor(|args| {
                    Ok(Tagged {
                        xy: args.take()?,
                        yx: args.take()?,
                    })
                })
                .build()
        )
    }
}

impl_dto!(Tagged { xy, yx });

// -----------------------------------------------------------------------------
// Legacy and invalid shapes

/// Plain parameters backed by public fields declared in another order.
#[derive(Debug)]
pub struct Legacy {
    pub title: String,
    pub count: i64,
    pub note: Option<String>,
}

impl Legacy {
    pub fn new(title: &str, count: i64, note: Option<&str>) -> Self {
        Self {
            title: title.into(),
            count,
            note: note.map(String::from),
        }
    }
}

impl DtoClass for Legacy {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .param(ParamInfo::new::<String>("title"))
                .param(ParamInfo::new::<i64>("count"))
                .param(ParamInfo::new::<Option<String>>("note").with_default(Value::Null))
                .field(FieldInfo::new::<Option<String>>("note"))
                .field(FieldInfo::new::<i64>("count"))
                .field(FieldInfo::new::<String>("title"))
                .constructor(|args| {
                    Ok(Legacy {
                        title: args.take()?,
                        count: args.take()?,
                        note: args.take()?,
                    })
                })
                .build()
        )
    }
}

impl_dto!(Legacy { title, count, note });

/// A promoted parameter mixed with a plain one that has no public field.
#[derive(Debug)]
pub struct MixedBroken {
    pub name: String,
    secret: String,
}

impl MixedBroken {
    pub fn new(name: &str, secret: &str) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
        }
    }
}

impl DtoClass for MixedBroken {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted(ParamInfo::new::<String>("name"))
                .param(ParamInfo::new::<String>("secret"))
                .field(FieldInfo::new::<String>("secret").with_visibility(Visibility::Private))
                .constructor(|args| {
                    Ok(MixedBroken {
                        name: args.take()?,
                        secret: args.take()?,
                    })
                })
                .build()
        )
    }
}

impl_dto!(MixedBroken { name, secret });

#[derive(Debug)]
pub struct HiddenPromoted {
    token: String,
}

impl DtoClass for HiddenPromoted {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted_as(Visibility::Protected, ParamInfo::new::<String>("token"))
                .constructor(|args| Ok(HiddenPromoted { token: args.take()? }))
                .build()
        )
    }
}

impl_dto!(HiddenPromoted { token });

#[derive(Debug)]
pub struct NoConstructor;

impl DtoClass for NoConstructor {
    fn class_info() -> &'static ClassInfo {
        class_info!(ClassInfo::builder::<Self>().build())
    }
}

impl_dto!(NoConstructor {});

// -----------------------------------------------------------------------------
// Opaque values

/// An amount of cents in a currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    pub amount: i64,
    pub currency: String,
}

impl Money {
    pub fn new(amount: i64, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Parses `"2.50 EUR"` or `{amount, currency}`.
    fn parse(value: Value) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::Conversion {
            expected: "Money",
            reason: reason.to_string(),
        };
        match value {
            Value::Str(text) => {
                let (amount, currency) = text
                    .split_once(' ')
                    .ok_or_else(|| invalid("a string without currency"))?;
                let (units, cents) = amount.split_once('.').unwrap_or((amount, "0"));
                let units: i64 = units.parse().map_err(|_| invalid("a malformed amount"))?;
                let cents: i64 = cents.parse().map_err(|_| invalid("a malformed amount"))?;
                Ok(Self::new(units * 100 + cents, currency))
            }
            Value::Map(map) => {
                let amount = map.get("amount").and_then(Value::as_int);
                let currency = map.get("currency").and_then(Value::as_str);
                match (amount, currency) {
                    (Some(amount), Some(currency)) => Ok(Self::new(amount, currency)),
                    _ => Err(invalid("an incomplete mapping")),
                }
            }
            other => Err(TypeError::mismatch("Money", other.kind())),
        }
    }
}

impl Opaque for Money {
    fn as_to_mapping(&self) -> Option<&dyn ToMapping> {
        Some(self)
    }

    fn as_to_serializable(&self) -> Option<&dyn ToSerializable> {
        Some(self)
    }

    fn opaque_eq(&self, other: &dyn Opaque) -> Option<bool> {
        other.downcast_ref::<Self>().map(|other| self == other)
    }
}

impl ToMapping for Money {
    fn to_mapping(&self) -> Mapping {
        Mapping::from([
            ("amount", Value::Int(self.amount)),
            ("currency", Value::from(self.currency.as_str())),
        ])
    }
}

impl ToSerializable for Money {
    fn to_serializable(&self) -> Value {
        Value::Str(format!("{}.{:02} {}", self.amount / 100, self.amount % 100, self.currency))
    }
}

impl OpaqueClass for Money {
    fn opaque_info() -> &'static OpaqueInfo {
        static CELL: OpaqueInfoCell = OpaqueInfoCell::new();
        CELL.get_or_init(|| {
            OpaqueInfo::new::<Self>()
                .with_constructor(|value| Ok(Arc::new(Money::parse(value)?) as OpaqueRef))
        })
    }
}

impl Declared for Money {
    fn declared_type() -> DeclaredType {
        DeclaredType::new(TypeKind::Opaque(Self::opaque_info))
    }
}

impl ToValue for Money {
    fn to_value(&self) -> Value {
        Value::opaque(self.clone())
    }
}

impl FromValue for Money {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Opaque(obj) => obj
                .downcast_ref::<Self>()
                .cloned()
                .ok_or(TypeError::mismatch("Money", ValueKind::Opaque)),
            other => Self::parse(other),
        }
    }
}

#[derive(Debug)]
pub struct Ledger {
    pub total: Money,
    pub entries: Vec<Money>,
}

impl Ledger {
    pub fn new(total: Money, entries: Vec<Money>) -> Self {
        Self { total, entries }
    }
}

impl DtoClass for Ledger {
    fn class_info() -> &'static ClassInfo {
        class_info!(
            ClassInfo::builder::<Self>()
                .promoted(ParamInfo::new::<Money>("total"))
                .promoted(ParamInfo::new::<Vec<Money>>("entries"))
                .constructor(|args| {
                    Ok(Ledger {
                        total: args.take()?,
                        entries: args.take()?,
                    })
                })
                .build()
        )
    }
}

impl_dto!(Ledger { total, entries });

#[cfg(feature = "time")]
pub use self::time::Event;

#[cfg(feature = "time")]
mod time {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::tags::AsStringTime;

    #[derive(Debug)]
    pub struct Event {
        pub name: String,
        pub at: DateTime<Utc>,
        pub logged: DateTime<Utc>,
    }

    impl Event {
        pub fn new(name: &str, at: DateTime<Utc>) -> Self {
            Self {
                name: name.into(),
                at,
                logged: at,
            }
        }
    }

    impl DtoClass for Event {
        fn class_info() -> &'static ClassInfo {
            class_info!(
                ClassInfo::builder::<Self>()
                    .promoted(ParamInfo::new::<String>("name"))
                    .promoted(
                        ParamInfo::new::<DateTime<Utc>>("at")
                            .with_tag(AsStringTime::new("%Y/%m/%d")),
                    )
                    .promoted(ParamInfo::new::<DateTime<Utc>>("logged"))
                    .constructor(|args| {
                        Ok(Event {
                            name: args.take()?,
                            at: args.take()?,
                            logged: args.take()?,
                        })
                    })
                    .build()
            )
        }
    }

    impl_dto!(Event { name, at, logged });
}
