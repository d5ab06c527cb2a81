use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxLanguageRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProjectImageRepo {
    pub pool: PgPool,
}
