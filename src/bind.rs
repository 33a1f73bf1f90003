// max size is 32 bytes without the optional feature payloads
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Null,
    String(String),
    StaticString(&'static str),
    Bool(bool),
    F32(f32),
    F64(f64),
    I16(i16),
    I32(i32),
    I64(i64),

    #[cfg(feature = "chrono")]
    ChronoDate(chrono::NaiveDate),
    #[cfg(feature = "chrono")]
    ChronoTime(chrono::NaiveTime),
    #[cfg(feature = "chrono")]
    ChronoDateTime(chrono::NaiveDateTime),
    #[cfg(feature = "chrono")]
    ChronoUtc(chrono::DateTime<chrono::Utc>),

    #[cfg(feature = "time")]
    Date(time::Date),
    #[cfg(feature = "time")]
    Time(time::Time),
    #[cfg(feature = "time")]
    PrimitiveDateTime(time::PrimitiveDateTime),
    #[cfg(feature = "time")]
    OffsetDateTime(time::OffsetDateTime),

    #[cfg(feature = "uuid")]
    Uuid(uuid::Uuid),

    #[cfg(feature = "json")]
    Json(serde_json::Value),
}

pub type Binds = Array<Bind>;

// if T <= 32 bytes we are good and it's a free data structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Array<T> {
    None,
    One(T),
    Many(Vec<T>),
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self::None
    }
}

impl<T> Array<T> {
    pub fn push(&mut self, value: T) {
        let combined = match std::mem::take(self) {
            Self::None => Self::One(value),
            Self::One(first) => Self::Many(vec![first, value]),
            Self::Many(mut items) => {
                items.push(value);
                Self::Many(items)
            }
        };
        *self = combined;
    }

    pub fn append(&mut self, other: Self) {
        let combined = match (std::mem::take(self), other) {
            (Self::None, items) | (items, Self::None) => items,
            (Self::One(a), Self::One(b)) => Self::Many(vec![a, b]),
            (Self::One(a), Self::Many(mut b)) => {
                b.insert(0, a);
                Self::Many(b)
            }
            (Self::Many(mut a), Self::One(b)) => {
                a.push(b);
                Self::Many(a)
            }
            (Self::Many(mut a), Self::Many(mut b)) => {
                a.append(&mut b);
                Self::Many(a)
            }
        };
        *self = combined;
    }

    pub fn len(&self) -> usize {
        match self {
            Array::None => 0,
            Array::One(_) => 1,
            Array::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::None => &[],
            Self::One(one) => std::slice::from_ref(one),
            Self::Many(many) => many.as_slice(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::None => Vec::new(),
            Self::One(one) => Vec::from([one]),
            Self::Many(many) => many,
        }
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::None;
        for item in iter {
            array.push(item);
        }
        array
    }
}

impl<T> IntoIterator for Array<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub trait IntoBind {
    fn into_bind(self) -> Bind;
}

pub trait IntoBinds {
    fn into_binds(self) -> Binds;
}

impl IntoBinds for Binds {
    fn into_binds(self) -> Binds {
        self
    }
}

impl IntoBinds for () {
    fn into_binds(self) -> Binds {
        Binds::None
    }
}

impl<T> IntoBinds for T
where
    T: IntoBind,
{
    fn into_binds(self) -> Binds {
        Binds::One(self.into_bind())
    }
}

impl<T> IntoBinds for Vec<T>
where
    T: IntoBind,
{
    fn into_binds(self) -> Binds {
        self.into_iter().map(IntoBind::into_bind).collect()
    }
}

impl<T, const N: usize> IntoBinds for [T; N]
where
    T: IntoBind,
{
    fn into_binds(self) -> Binds {
        self.into_iter().map(IntoBind::into_bind).collect()
    }
}

impl IntoBind for Bind {
    fn into_bind(self) -> Bind {
        self
    }
}

impl<T> IntoBind for Option<T>
where
    T: IntoBind,
{
    fn into_bind(self) -> Bind {
        if let Some(value) = self {
            value.into_bind()
        } else {
            Bind::Null
        }
    }
}

macro_rules! into_bind {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl IntoBind for $ty {
                fn into_bind(self) -> Bind {
                    Bind::$variant(self.into())
                }
            }
        )+
    };
}

into_bind! {
    bool => Bool,
    f32 => F32,
    f64 => F64,
    i8 => I16,
    i16 => I16,
    u8 => I16,
    i32 => I32,
    u16 => I32,
    i64 => I64,
    u32 => I64,
    String => String,
    &String => String,
    Box<str> => String,
}

impl IntoBind for &'static str {
    fn into_bind(self) -> Bind {
        Bind::StaticString(self)
    }
}

impl IntoBind for std::borrow::Cow<'static, str> {
    fn into_bind(self) -> Bind {
        match self {
            std::borrow::Cow::Borrowed(value) => Bind::StaticString(value),
            std::borrow::Cow::Owned(value) => Bind::String(value),
        }
    }
}

#[cfg(feature = "chrono")]
into_bind! {
    chrono::NaiveDate => ChronoDate,
    chrono::NaiveTime => ChronoTime,
    chrono::NaiveDateTime => ChronoDateTime,
    chrono::DateTime<chrono::Utc> => ChronoUtc,
}

#[cfg(feature = "time")]
into_bind! {
    time::Date => Date,
    time::Time => Time,
    time::PrimitiveDateTime => PrimitiveDateTime,
    time::OffsetDateTime => OffsetDateTime,
}

#[cfg(feature = "uuid")]
into_bind! {
    uuid::Uuid => Uuid,
}

#[cfg(feature = "json")]
into_bind! {
    serde_json::Value => Json,
}

#[cfg(feature = "secrecy")]
impl IntoBind for secrecy::SecretString {
    fn into_bind(self) -> Bind {
        use secrecy::ExposeSecret;
        Bind::String(self.expose_secret().to_owned())
    }
}
