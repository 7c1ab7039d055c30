//! Map Feature Table
//!
//! Every "map-like" material capability (diffuse, normal, gloss, …) is a
//! variant of [`MapFeature`]. Each variant has a static
//! [`FeatureDescriptor`] holding the facts the generator needs about it,
//! so option lookups are typed table accesses instead of key names
//! assembled at runtime.

/// Static facts about one map feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureDescriptor {
    /// camelCase base name; the sampler is `texture_<name>Map`.
    pub name: &'static str,
    /// Components the feature's chunk samples. `None` for fixed layouts
    /// (normal maps) whose channel mask is never corrected.
    pub channels: Option<usize>,
    /// Channel mask used when the material does not set one.
    pub default_channel: &'static str,
    /// Whether the chunk decodes colour and takes an encoding hint.
    pub decodes: bool,
}

macro_rules! define_map_features {
    (
        $( $variant:ident => ($name:literal, $channels:expr, $default:literal, $decodes:literal) ),* $(,)?
    ) => {
        /// A map-like material feature.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum MapFeature {
            $( $variant, )*
        }

        impl MapFeature {
            /// All features, in declaration order.
            pub const ALL: &'static [MapFeature] = &[ $( MapFeature::$variant, )* ];

            /// Number of features.
            pub const COUNT: usize = Self::ALL.len();

            /// Static descriptor of this feature.
            #[must_use]
            pub const fn descriptor(self) -> &'static FeatureDescriptor {
                match self {
                    $(
                        MapFeature::$variant => {
                            const DESCRIPTOR: FeatureDescriptor = FeatureDescriptor {
                                name: $name,
                                channels: $channels,
                                default_channel: $default,
                                decodes: $decodes,
                            };
                            &DESCRIPTOR
                        }
                    )*
                }
            }
        }
    };
}

define_map_features! {
    Diffuse              => ("diffuse",              Some(3), "rgb", true),
    DiffuseDetail        => ("diffuseDetail",        Some(3), "rgb", true),
    Normal               => ("normal",               None,    "",    false),
    NormalDetail         => ("normalDetail",         None,    "",    false),
    Height               => ("height",               Some(1), "g",   false),
    Opacity              => ("opacity",              Some(1), "a",   false),
    Ao                   => ("ao",                   Some(1), "g",   false),
    AoDetail             => ("aoDetail",             Some(1), "g",   false),
    Emissive             => ("emissive",             Some(3), "rgb", true),
    Specular             => ("specular",             Some(3), "rgb", true),
    Gloss                => ("gloss",                Some(1), "g",   false),
    Metalness            => ("metalness",            Some(1), "g",   false),
    Ior                  => ("ior",                  None,    "",    false),
    SpecularityFactor    => ("specularityFactor",    Some(1), "g",   false),
    Sheen                => ("sheen",                Some(3), "rgb", true),
    SheenGloss           => ("sheenGloss",           Some(1), "g",   false),
    ClearCoat            => ("clearCoat",            Some(1), "r",   false),
    ClearCoatGloss       => ("clearCoatGloss",       Some(1), "g",   false),
    ClearCoatNormal      => ("clearCoatNormal",      None,    "",    false),
    Iridescence          => ("iridescence",          Some(1), "r",   false),
    IridescenceThickness => ("iridescenceThickness", Some(1), "g",   false),
    Refraction           => ("refraction",           Some(1), "r",   false),
    Thickness            => ("thickness",            Some(1), "g",   false),
    Light                => ("light",                Some(3), "rgb", true),
}

impl MapFeature {
    /// camelCase base name, e.g. `clearCoatGloss`.
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Position of this feature in [`MapFeature::ALL`].
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Default sampler identifier for this feature's texture.
    #[must_use]
    pub fn sampler_name(self) -> String {
        format!("texture_{}Map", self.name())
    }
}

impl std::fmt::Display for MapFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
