//! Column headers of the registration and license extracts.

pub mod vehicle {
    pub const SEQUENCE: &str = "NOSEQ_VEH";
    pub const CLASS: &str = "CLAS";
    pub const TYPE: &str = "TYP_VEH_CATEG_USA";
    pub const MAKE: &str = "MARQ_VEH";
    pub const MODEL: &str = "MODEL_VEH";
    pub const MODEL_YEAR: &str = "ANNEE_MOD";
    pub const NET_MASS: &str = "MASSE_NETTE";
    pub const CYLINDER_COUNT: &str = "NB_CYL";
    pub const DISPLACEMENT: &str = "CYL_VEH";
    pub const AXLE_COUNT: &str = "NB_ESIEU_MAX";
    pub const COLOR: &str = "COUL_ORIG";
    pub const FUEL_TYPE: &str = "TYP_CARBU";
    pub const ADMIN_REGION: &str = "REG_ADM";
    pub const MRC: &str = "MRC";
    pub const MUNICIPALITY: &str = "CG_FIXE";
}

pub mod license {
    pub const SEQUENCE: &str = "NOSEQ_TITULAIRE";
    pub const AGE_GROUP: &str = "AGE_1ER_JUIN";
    pub const GENDER: &str = "SEXE";
    pub const MRC: &str = "MRC";
    pub const ADMIN_REGION: &str = "REG_ADM";
    pub const LICENSE_TYPE: &str = "TYPE_PERMIS";
    pub const LEARNER_PERMIT_123: &str = "IND_PERMISAPPRENTI_123";
    pub const LEARNER_PERMIT_5: &str = "IND_PERMISAPPRENTI_5";
    pub const LEARNER_PERMIT_6A6R: &str = "IND_PERMISAPPRENTI_6A6R";
    pub const DRIVER_LICENSE_1234: &str = "IND_PERMISCONDUIRE_1234";
    pub const DRIVER_LICENSE_5: &str = "IND_PERMISCONDUIRE_5";
    pub const DRIVER_LICENSE_6ABCE: &str = "IND_PERMISCONDUIRE_6ABCE";
    pub const DRIVER_LICENSE_6D: &str = "IND_PERMISCONDUIRE_6D";
    pub const DRIVER_LICENSE_8: &str = "IND_PERMISCONDUIRE_8";
    pub const PROBATIONARY: &str = "IND_PROBATOIRE";
    pub const EXPERIENCE_1234: &str = "EXPERIENCE_1234";
    pub const EXPERIENCE_5: &str = "EXPERIENCE_5";
    pub const EXPERIENCE_6ABCE: &str = "EXPERIENCE_6ABCE";
    pub const EXPERIENCE_GLOBAL: &str = "EXPERIENCE_GLOBALE";
}
