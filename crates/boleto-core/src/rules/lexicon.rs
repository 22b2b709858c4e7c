//! Fixed term lists used by the rule extractors.
//!
//! Every entry is already in [`normalize_for_match`](crate::text::normalize_for_match)
//! form, so lookups compare folded text against these directly.

/// Labels introducing a billing address.
pub const ADDRESS_LABELS: &[&str] = &["endereco de cobranca", "endereco", "cobranca"];

/// Street-type words that mark an address line.
pub const ADDRESS_KEYWORDS: &[&str] = &[
    "rua",
    "avenida",
    "av ",
    "av.",
    "alameda",
    "travessa",
    "rodovia",
    "estrada",
    "praca",
    "logradouro",
    "lote",
    "quadra",
];

/// Terms that can follow an address label but are never an address.
pub const ADDRESS_BLACKLIST: &[&str] = &[
    "vencimento",
    "valor",
    "nosso numero",
    "numero do documento",
    "cpf",
    "cnpj",
    "agencia",
    "carteira",
    "local de pagamento",
];

/// Labels introducing the payee (who receives the payment).
pub const PAYEE_LABELS: &[&str] = &["cedente", "beneficiario", "favorecido", "recebedor"];

/// Labels introducing the payer block.
pub const PAYER_LABELS: &[&str] = &["sacado", "pagador", "cliente"];

/// Administrative terms that disqualify a candidate name.
pub const NAME_BLACKLIST: &[&str] = &[
    "autenticacao mecanica",
    "beneficiario",
    "data do documento",
    "nosso numero",
    "local de pagamento",
    "numero do documento",
    "recibo do pagador",
    "agencia",
    "banco",
    "carteira",
    "vencimento",
    "valor",
    "pagamento",
    "sacado",
    "pagador",
    "cliente",
    "cpf",
    "cnpj",
    "i.e.",
    "ie:",
    "inscricao estadual",
];

/// Anchor near which the payee's own registration number is printed.
pub const PAYEE_REGISTRATION_ANCHORS: &[&str] = &["cnpj matriz", "cnpj do beneficiario", "cnpj/cpf do beneficiario"];

/// Payee names accepted as a last resort.
pub const KNOWN_PAYEES: &[&str] = &[
    "Telefonica Brasil S.A",
    "Ibagy Imoveis Ltda",
    "Nick Cont Servicos Contabeis Ltda",
    "FJR Telecom",
    "Obvious Fibra",
];

/// Keywords that mark an instruction line.
pub const INSTRUCTION_KEYWORDS: &[&str] = &[
    "instrucao",
    "instrucoes",
    "juros",
    "multa",
    "protesto",
    "apos",
    "nao receber",
    "nao aceitar",
];

/// Words that put a money-shaped token in amount context.
pub const AMOUNT_CONTEXT_TERMS: &[&str] = &["valor", "total", "a pagar", "pagar", "documento"];

/// Administrative phrases never accepted as a keyword value.
pub const NOISE_STOP_PHRASES: &[&str] = &[
    "nosso numero",
    "numero do documento",
    "vencimento",
    "data de vencimento",
    "data do documento",
    "data de emissao",
    "valor",
    "valor do documento",
    "valor cobrado",
    "beneficiario",
    "cedente",
    "pagador",
    "sacado",
    "cpf",
    "cnpj",
    "cpf/cnpj",
    "agencia",
    "agencia/codigo do beneficiario",
    "carteira",
    "especie",
    "especie doc",
    "aceite",
    "local de pagamento",
    "instrucoes",
    "autenticacao mecanica",
    "recibo do pagador",
    "codigo de barras",
    "linha digitavel",
];

/// Labels introducing a date of birth.
pub const BIRTH_DATE_LABELS: &[&str] = &["data de nascimento", "nascimento", "nascido em", "nascida em", "d.n."];
